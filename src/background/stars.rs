use super::canvas::{Blend, Canvas, Rgba};
use super::host::Viewport;
use super::resolve::ResolvedConfig;
use crate::types::Tier;
use kurbo::{Point, Vec2};
use rand::Rng;
use std::f64::consts::TAU;

pub const LAYER_COUNT: usize = 3;

const LAYER_SPEED: [f64; LAYER_COUNT] = [0.02, 0.05, 0.09];
const LAYER_SIZE: [(f64, f64); LAYER_COUNT] = [(0.5, 1.0), (0.8, 1.4), (1.2, 2.0)];
const LAYER_ALPHA: [f32; LAYER_COUNT] = [0.45, 0.65, 0.9];
const LAYER_COLOR: [Rgba; LAYER_COUNT] = [
    Rgba::rgb(150, 156, 245),
    Rgba::rgb(196, 200, 255),
    Rgba::rgb(240, 242, 255),
];
const GLOW_ALPHA: f32 = 0.3;
const TWINKLE_SPEED: (f64, f64) = (0.5, 1.7);

const LINK_DISTANCE: f64 = 120.0;
const LINK_ALPHA: f32 = 0.05;
const LINK_COLOR: Rgba = Rgba::rgb(99, 102, 241);

/// A persistent background star.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub position: Point,
    pub base_size: f64,
    /// 0 is the slow, small background band; 2 the fast, large foreground.
    pub layer: usize,
    /// CSS pixels per accepted tick.
    pub velocity: Vec2,
    pub twinkle_phase: f64,
    pub twinkle_speed: f64,
}

impl Star {
    /// Radius multiplier at `clock_ms`.
    pub fn twinkle_factor(&self, clock_ms: f64, enabled: bool) -> f64 {
        if !enabled {
            return 1.0;
        }
        0.6 + 0.4 * (self.twinkle_phase + clock_ms * 0.001 * self.twinkle_speed).sin()
    }
}

/// Split `total` stars 50% / 35% / rest across the three layers.
pub fn layer_counts(total: usize) -> [usize; LAYER_COUNT] {
    let back = (total as f64 * 0.5).floor() as usize;
    let mid = (total as f64 * 0.35).floor() as usize;
    [back, mid, total - back - mid]
}

/// The fixed star population, created once per mount.
#[derive(Debug, Clone)]
pub struct StarField {
    stars: Vec<Star>,
    bounds: Viewport,
}

impl StarField {
    pub fn empty() -> Self {
        Self {
            stars: Vec::new(),
            bounds: Viewport::new(1.0, 1.0),
        }
    }

    pub fn new<R: Rng + ?Sized>(
        rng: &mut R,
        bounds: Viewport,
        density_target: usize,
        speed_factor: f64,
    ) -> Self {
        let bounds = sane_bounds(bounds);
        let counts = layer_counts(density_target);
        let mut stars = Vec::with_capacity(density_target);

        for (layer, &count) in counts.iter().enumerate() {
            let (min_size, max_size) = LAYER_SIZE[layer];
            let speed = LAYER_SPEED[layer] * speed_factor;
            for _ in 0..count {
                stars.push(Star {
                    position: Point::new(
                        rng.gen_range(0.0..bounds.width),
                        rng.gen_range(0.0..bounds.height),
                    ),
                    base_size: rng.gen_range(min_size..max_size),
                    layer,
                    velocity: Vec2::new(
                        rng.gen_range(-0.5..=0.5) * speed,
                        rng.gen_range(-0.5..=0.5) * speed,
                    ),
                    twinkle_phase: rng.gen_range(0.0..TAU),
                    twinkle_speed: rng.gen_range(TWINKLE_SPEED.0..=TWINKLE_SPEED.1),
                });
            }
        }

        Self { stars, bounds }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn bounds(&self) -> Viewport {
        self.bounds
    }

    /// Number of stars in each layer.
    pub fn counts(&self) -> [usize; LAYER_COUNT] {
        let mut counts = [0; LAYER_COUNT];
        for star in &self.stars {
            counts[star.layer] += 1;
        }
        counts
    }

    /// Adopt new surface bounds, folding stars that now lie outside back in.
    pub fn set_bounds(&mut self, bounds: Viewport) {
        self.bounds = sane_bounds(bounds);
        let Viewport { width, height } = self.bounds;
        for star in &mut self.stars {
            star.position = Point::new(wrap(star.position.x, width), wrap(star.position.y, height));
        }
    }

    /// Move every star one step. Motion is per tick, not per millisecond.
    pub fn advance(&mut self) {
        let Viewport { width, height } = self.bounds;
        for star in &mut self.stars {
            let p = star.position + star.velocity;
            star.position = Point::new(wrap(p.x, width), wrap(p.y, height));
        }
    }

    /// Draw back to front. Leaves the canvas blend mode as it found it.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, clock_ms: f64, config: &ResolvedConfig) {
        let prior = canvas.blend();
        canvas.set_blend(if config.tier == Tier::Low {
            Blend::SourceOver
        } else {
            Blend::Additive
        });

        if config.constellations_enabled {
            self.render_links(canvas);
        }

        for layer in 0..LAYER_COUNT {
            let color = LAYER_COLOR[layer];
            let alpha = LAYER_ALPHA[layer];
            let glow = config.glow_by_layer[layer];
            for star in self.stars.iter().filter(|s| s.layer == layer) {
                let radius = star.base_size * star.twinkle_factor(clock_ms, config.twinkle_enabled);
                if glow > 0.0 {
                    canvas.fill_glow(star.position, radius + glow, color.with_alpha(alpha * GLOW_ALPHA));
                }
                canvas.fill_circle(star.position, radius, color.with_alpha(alpha));
            }
        }

        canvas.set_blend(prior);
    }

    fn render_links<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let front: Vec<&Star> = self
            .stars
            .iter()
            .filter(|s| s.layer == LAYER_COUNT - 1)
            .collect();
        for (i, a) in front.iter().enumerate() {
            for b in &front[i + 1..] {
                let d = a.position.distance(b.position);
                if d < LINK_DISTANCE {
                    let alpha = LINK_ALPHA * (1.0 - d / LINK_DISTANCE) as f32;
                    canvas.stroke_line(a.position, b.position, 1.0, LINK_COLOR.with_alpha(alpha));
                }
            }
        }
    }
}

fn sane_bounds(bounds: Viewport) -> Viewport {
    let fix = |v: f64| if v.is_finite() && v >= 1.0 { v } else { 1.0 };
    Viewport::new(fix(bounds.width), fix(bounds.height))
}

/// Euclidean wrap into `[0, extent)`.
fn wrap(v: f64, extent: f64) -> f64 {
    let w = v.rem_euclid(extent);
    // rem_euclid can round up to `extent` for tiny negative inputs
    if w >= extent {
        0.0
    } else {
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::resolve::resolve;
    use crate::background::testing::{DrawCall, RecordingCanvas};
    use crate::types::BackgroundOptions;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field(total: usize, w: f64, h: f64) -> StarField {
        let mut rng = StdRng::seed_from_u64(7);
        StarField::new(&mut rng, Viewport::new(w, h), total, 1.0)
    }

    fn config(tier: Tier) -> ResolvedConfig {
        resolve(
            &BackgroundOptions {
                performance: Some(tier),
                ..Default::default()
            },
            false,
        )
    }

    #[test]
    fn layer_counts_sum_to_total() {
        for total in 20..2000 {
            let counts = layer_counts(total);
            assert_eq!(counts.iter().sum::<usize>(), total);
            assert_eq!(counts[0], total / 2);
        }
        assert_eq!(layer_counts(100), [50, 35, 15]);
    }

    #[test]
    fn new_field_matches_counts_and_ranges() {
        let f = field(128, 800.0, 600.0);
        assert_eq!(f.len(), 128);
        assert_eq!(f.counts(), layer_counts(128));
        for s in f.stars() {
            let (lo, hi) = LAYER_SIZE[s.layer];
            assert!(s.base_size >= lo && s.base_size < hi);
            let limit = 0.5 * LAYER_SPEED[s.layer] + 1e-12;
            assert!(s.velocity.x.abs() <= limit && s.velocity.y.abs() <= limit);
            assert!((0.0..TAU).contains(&s.twinkle_phase));
            assert!((0.5..=1.7).contains(&s.twinkle_speed));
        }
    }

    #[test]
    fn stars_stay_inside_bounds_forever() {
        let mut f = field(200, 300.0, 200.0);
        // Exaggerate the speeds so stars cross edges often.
        for s in f.stars.iter_mut() {
            s.velocity = s.velocity * 4000.0;
        }
        for _ in 0..500 {
            f.advance();
            for s in f.stars() {
                assert!(s.position.x >= 0.0 && s.position.x < 300.0);
                assert!(s.position.y >= 0.0 && s.position.y < 200.0);
            }
        }
    }

    #[test]
    fn star_exiting_an_edge_reenters_opposite() {
        let mut f = field(20, 100.0, 100.0);
        f.stars[0].position = Point::new(99.99, 0.01);
        f.stars[0].velocity = Vec2::new(0.02, -0.02);
        f.advance();
        let p = f.stars[0].position;
        assert!(p.x < 1.0);
        assert!(p.y > 99.0);
    }

    #[test]
    fn shrinking_bounds_folds_stars_back_in() {
        let mut f = field(100, 1000.0, 1000.0);
        f.set_bounds(Viewport::new(200.0, 100.0));
        for s in f.stars() {
            assert!(s.position.x < 200.0 && s.position.y < 100.0);
        }
    }

    #[test]
    fn twinkle_is_bounded_and_optional() {
        let f = field(20, 100.0, 100.0);
        for s in f.stars() {
            assert_eq!(s.twinkle_factor(1234.0, false), 1.0);
            for t in [0.0, 500.0, 9_999.0] {
                let k = s.twinkle_factor(t, true);
                assert!((0.2..=1.0).contains(&k));
            }
        }
    }

    #[test]
    fn renders_layers_back_to_front_with_additive_blend() {
        let f = field(60, 400.0, 400.0);
        let mut canvas = RecordingCanvas::default();
        f.render(&mut canvas, 0.0, &config(Tier::High));

        assert_eq!(canvas.calls.first(), Some(&DrawCall::Blend(Blend::Additive)));
        assert_eq!(canvas.calls.last(), Some(&DrawCall::Blend(Blend::SourceOver)));
        let layers: Vec<usize> = canvas
            .circles()
            .map(|(center, _)| {
                f.stars()
                    .iter()
                    .find(|s| s.position == center)
                    .map(|s| s.layer)
                    .unwrap()
            })
            .collect();
        assert_eq!(layers.len(), 60);
        assert!(layers.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn low_tier_disables_additive_blend() {
        let f = field(20, 100.0, 100.0);
        let mut canvas = RecordingCanvas::default();
        f.render(&mut canvas, 0.0, &config(Tier::Low));
        assert!(!canvas.calls.contains(&DrawCall::Blend(Blend::Additive)));
    }

    #[test]
    fn constellations_link_close_foreground_stars() {
        let mut f = field(20, 400.0, 400.0);
        for s in f.stars.iter_mut() {
            s.position = Point::new(10.0, 10.0);
        }
        let front = f.counts()[2];
        let mut cfg = config(Tier::High);
        cfg.constellations_enabled = true;
        let mut canvas = RecordingCanvas::default();
        f.render(&mut canvas, 0.0, &cfg);
        assert_eq!(canvas.lines().count(), front * (front - 1) / 2);
    }
}
