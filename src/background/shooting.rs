use super::canvas::{Blend, Canvas, Rgba};
use super::host::Viewport;
use super::resolve::ResolvedConfig;
use kurbo::{Point, Vec2};
use rand::Rng;

const FADE_IN_MS: f64 = 220.0;
const LIFETIME_MS: f64 = 1700.0;
const RETIRE_MARGIN: f64 = 120.0;
const ENTRY_OFFSET: (f64, f64) = (40.0, 120.0);
const SPEED_PX_PER_S: (f64, f64) = (420.0, 640.0);
const PEAK_OPACITY: f64 = 0.9;

const HEAD_RADIUS: f64 = 1.6;
const TRAIL_WIDTH: f64 = 2.2;
const HEAD_COLOR: Rgba = Rgba::rgb(255, 255, 255);
const TRAIL_COLOR: Rgba = Rgba::rgb(205, 214, 255);

/// Entry pattern of a shooting star, named by where it comes from and goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trajectory {
    NorthWestToSouthEast,
    NorthEastToSouthWest,
    WestToEast,
    EastToWest,
}

impl Trajectory {
    pub const ALL: [Trajectory; 4] = [
        Trajectory::NorthWestToSouthEast,
        Trajectory::NorthEastToSouthWest,
        Trajectory::WestToEast,
        Trajectory::EastToWest,
    ];

    /// Heading range in degrees, clockwise from +x with y pointing down.
    pub fn angle_range(self) -> (f64, f64) {
        match self {
            Trajectory::NorthWestToSouthEast => (20.0, 55.0),
            Trajectory::NorthEastToSouthWest => (125.0, 160.0),
            Trajectory::WestToEast => (5.0, 20.0),
            Trajectory::EastToWest => (160.0, 175.0),
        }
    }

    /// A start point just outside the edge the pattern enters from.
    fn entry<R: Rng + ?Sized>(self, rng: &mut R, bounds: Viewport) -> Point {
        let Viewport { width: w, height: h } = bounds;
        let off = rng.gen_range(ENTRY_OFFSET.0..=ENTRY_OFFSET.1);
        match self {
            Trajectory::NorthWestToSouthEast => {
                if rng.gen_bool(0.5) {
                    Point::new(rng.gen_range(0.0..=w * 0.75), -off)
                } else {
                    Point::new(-off, rng.gen_range(0.0..=h * 0.6))
                }
            }
            Trajectory::NorthEastToSouthWest => {
                if rng.gen_bool(0.5) {
                    Point::new(rng.gen_range(w * 0.25..=w), -off)
                } else {
                    Point::new(w + off, rng.gen_range(0.0..=h * 0.6))
                }
            }
            Trajectory::WestToEast => Point::new(-off, rng.gen_range(0.0..=h * 0.7)),
            Trajectory::EastToWest => Point::new(w + off, rng.gen_range(0.0..=h * 0.7)),
        }
    }
}

/// A transient streak. Owned by [`ShootingStars`].
#[derive(Debug, Clone, PartialEq)]
pub struct ShootingStar {
    pub position: Point,
    /// Pixels per millisecond.
    pub velocity: Vec2,
    /// Starts at 1; retired at or below 0.
    pub life: f64,
    /// Fade-in progress in `[0, 1]`.
    pub age: f64,
    pub trail_length: f64,
}

impl ShootingStar {
    pub fn opacity(&self) -> f64 {
        (PEAK_OPACITY * self.life * self.age).clamp(0.0, 1.0)
    }

    fn is_outside(&self, bounds: Viewport) -> bool {
        let Point { x, y } = self.position;
        x < -RETIRE_MARGIN
            || y < -RETIRE_MARGIN
            || x > bounds.width + RETIRE_MARGIN
            || y > bounds.height + RETIRE_MARGIN
    }
}

/// Time-based spawner plus the active set it feeds.
#[derive(Debug, Clone, Default)]
pub struct ShootingStars {
    active: Vec<ShootingStar>,
    accumulator: f64,
    spawned: u64,
    dropped: u64,
}

impl ShootingStars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    /// Spawns discarded because the active set was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    /// Every whole spawn the accumulator has produced so far.
    pub fn opportunities(&self) -> u64 {
        self.spawned + self.dropped
    }

    /// Accrue `elapsed_ms` worth of spawn rate and create what fits.
    ///
    /// Spawns that find the active set full are dropped, not queued.
    /// Returns how many stars were created.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        elapsed_ms: f64,
        bounds: Viewport,
        config: &ResolvedConfig,
    ) -> usize {
        self.accumulator += config.spawn_rate_per_second * elapsed_ms.max(0.0) / 1000.0;
        let due = self.accumulator.floor();
        self.accumulator -= due;

        let mut created = 0;
        for _ in 0..due as u64 {
            if self.active.len() < config.max_concurrent_shooters {
                let star = create(rng, bounds, config);
                self.active.push(star);
                self.spawned += 1;
                created += 1;
            } else {
                self.dropped += 1;
            }
        }
        created
    }

    /// Integrate motion and fades, then retire spent or escaped stars.
    pub fn advance(&mut self, elapsed_ms: f64, bounds: Viewport, config: &ResolvedConfig) {
        let decay = elapsed_ms / LIFETIME_MS * config.tier_damping * config.speed_factor;
        for star in &mut self.active {
            star.position += star.velocity * elapsed_ms;
            star.age = (star.age + elapsed_ms / FADE_IN_MS).min(1.0);
            star.life -= decay;
        }
        self.active
            .retain(|star| star.life > 0.0 && !star.is_outside(bounds));
    }

    /// One tick of updates: spawn (when enabled) then advance.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        elapsed_ms: f64,
        bounds: Viewport,
        config: &ResolvedConfig,
    ) {
        if config.shooting_enabled {
            self.spawn(rng, elapsed_ms, bounds, config);
        }
        self.advance(elapsed_ms, bounds, config);
    }

    /// Draw in creation order, restoring the blend mode after each star.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, config: &ResolvedConfig) {
        for star in &self.active {
            let opacity = star.opacity() as f32;
            if opacity <= 0.0 {
                continue;
            }
            let dir = star.velocity.normalize();
            let tail = star.position - dir * star.trail_length;

            let prior = canvas.blend();
            canvas.set_blend(Blend::Additive);
            canvas.stroke_trail(star.position, tail, TRAIL_WIDTH, TRAIL_COLOR.with_alpha(opacity));
            canvas.fill_glow(
                star.position,
                HEAD_RADIUS + config.head_glow,
                HEAD_COLOR.with_alpha(opacity * 0.5),
            );
            canvas.fill_circle(star.position, HEAD_RADIUS, HEAD_COLOR.with_alpha(opacity));
            canvas.set_blend(prior);
        }
    }
}

fn create<R: Rng + ?Sized>(rng: &mut R, bounds: Viewport, config: &ResolvedConfig) -> ShootingStar {
    let pattern = Trajectory::ALL[rng.gen_range(0..Trajectory::ALL.len())];
    let (lo, hi) = pattern.angle_range();
    let heading = rng.gen_range(lo..=hi).to_radians();
    let speed = rng.gen_range(SPEED_PX_PER_S.0..=SPEED_PX_PER_S.1)
        * config.speed_factor
        * config.tier_damping
        / 1000.0;

    ShootingStar {
        position: pattern.entry(rng, bounds),
        velocity: Vec2::from_angle(heading) * speed,
        life: 1.0,
        age: 0.0,
        trail_length: rng.gen_range(config.trail_range.0..=config.trail_range.1),
    }
}
