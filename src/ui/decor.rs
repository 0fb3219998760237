//! Floating rings and gradient orbs drawn over the star field.
//!
//! Purely ornamental and time-based; shown only while the resolved
//! background config has decor enabled.

use super::theme;
use crate::background::host::{CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::background::Viewport;
use kurbo::{Point, Vec2};
use rand::Rng;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use ratatui::Frame;
use std::f64::consts::TAU;

const RING_COUNT: usize = 3;
const RING_SIZE: f64 = 96.0;
const RING_DURATION_S: (f64, f64) = (25.0, 35.0);
const RING_STAGGER_S: f64 = 3.0;
const RING_OPACITY: f64 = 0.1;

const ORB_COUNT: usize = 2;
const ORB_SIZE: f64 = 192.0;
const ORB_DURATION_S: (f64, f64) = (20.0, 30.0);
const ORB_STAGGER_S: f64 = 5.0;
const ORB_OPACITY: f64 = 0.05;
const ORB_HOME: Point = Point::new(-100.0, -100.0);
/// The gradient is transparent from 70% of the radius outwards.
const ORB_FADE: f64 = 0.7;
/// Terminal cells need a stronger tint than a full-resolution gradient.
const ORB_GAIN: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Ring,
    Orb([u8; 3]),
}

/// One shape at a moment in time, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub kind: ShapeKind,
    pub center: Point,
    pub radius: f64,
    /// Radians.
    pub rotation: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone)]
struct Ring {
    from: Point,
    to: Point,
    duration: f64,
    delay: f64,
}

#[derive(Debug, Clone)]
struct Orb {
    to: Point,
    duration: f64,
    delay: f64,
    color: [u8; 3],
}

/// The randomized set of decorative shapes for one mount.
#[derive(Debug, Clone)]
pub struct DecorField {
    rings: Vec<Ring>,
    orbs: Vec<Orb>,
}

impl DecorField {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, viewport: Viewport) -> Self {
        let w = viewport.width.max(1.0);
        let h = viewport.height.max(1.0);
        let random_point = |rng: &mut R| Point::new(rng.gen_range(0.0..w), rng.gen_range(0.0..h));

        let rings = (0..RING_COUNT)
            .map(|i| Ring {
                from: random_point(rng),
                to: random_point(rng),
                duration: rng.gen_range(RING_DURATION_S.0..RING_DURATION_S.1),
                delay: i as f64 * RING_STAGGER_S,
            })
            .collect();

        let orbs = (0..ORB_COUNT)
            .map(|i| Orb {
                to: random_point(rng),
                duration: rng.gen_range(ORB_DURATION_S.0..ORB_DURATION_S.1),
                delay: i as f64 * ORB_STAGGER_S,
                color: if i % 2 == 0 {
                    theme::ORB_INDIGO
                } else {
                    theme::ORB_VIOLET
                },
            })
            .collect();

        Self { rings, orbs }
    }

    /// Shapes visible `t` seconds after mount.
    pub fn shapes(&self, t: f64) -> Vec<Shape> {
        let mut out = Vec::with_capacity(RING_COUNT + ORB_COUNT);

        for orb in &self.orbs {
            let progress = if t < orb.delay {
                0.0
            } else {
                ease_in_out(ping_pong((t - orb.delay) / orb.duration))
            };
            let top_left = ORB_HOME.lerp(orb.to, progress);
            out.push(Shape {
                kind: ShapeKind::Orb(orb.color),
                center: top_left + Vec2::new(ORB_SIZE / 2.0, ORB_SIZE / 2.0),
                radius: ORB_SIZE / 2.0,
                rotation: 0.0,
                opacity: ORB_OPACITY,
            });
        }

        for ring in &self.rings {
            if t < ring.delay {
                continue;
            }
            let p = ((t - ring.delay) / ring.duration).fract();
            let scale = 1.0 - (2.0 * p - 1.0).abs();
            if scale <= 0.0 {
                continue;
            }
            let top_left = ring.from.lerp(ring.to, p);
            out.push(Shape {
                kind: ShapeKind::Ring,
                center: top_left + Vec2::new(RING_SIZE / 2.0, RING_SIZE / 2.0),
                radius: RING_SIZE / 2.0 * scale,
                rotation: TAU * p,
                opacity: RING_OPACITY,
            });
        }

        out
    }
}

/// Forward on even cycles, backward on odd ones.
fn ping_pong(cycles: f64) -> f64 {
    let p = cycles.fract();
    if (cycles.floor() as u64) % 2 == 0 {
        p
    } else {
        1.0 - p
    }
}

fn ease_in_out(p: f64) -> f64 {
    p * p * (3.0 - 2.0 * p)
}

pub fn draw_decor(f: &mut Frame, area: Rect, field: &DecorField, t: f64) {
    let shapes = field.shapes(t);
    f.render_widget(DecorWidget { shapes: &shapes }, area);
}

/// Draws shapes onto empty sky cells only, so stars stay on top.
struct DecorWidget<'a> {
    shapes: &'a [Shape],
}

impl Widget for DecorWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for shape in self.shapes {
            match shape.kind {
                ShapeKind::Orb(color) => render_orb(shape, color, area, buf),
                ShapeKind::Ring => render_ring(shape, area, buf),
            }
        }
    }
}

fn cell_at(area: Rect, p: Point) -> Option<(u16, u16)> {
    let col = (p.x / CELL_WIDTH_PX).floor();
    let row = (p.y / CELL_HEIGHT_PX).floor();
    if col < 0.0 || row < 0.0 || col >= area.width as f64 || row >= area.height as f64 {
        return None;
    }
    Some((area.x + col as u16, area.y + row as u16))
}

fn is_empty_sky(buf: &Buffer, pos: (u16, u16)) -> bool {
    buf[pos].symbol() == " "
}

fn render_ring(shape: &Shape, area: Rect, buf: &mut Buffer) {
    let steps = ((TAU * shape.radius / CELL_WIDTH_PX).ceil() as usize).max(12);
    for k in 0..steps {
        let angle = TAU * k as f64 / steps as f64;
        let p = shape.center + Vec2::from_angle(angle) * shape.radius;
        if let Some(pos) = cell_at(area, p) {
            if is_empty_sky(buf, pos) {
                buf[pos].set_char('·').set_style(Style::default().fg(theme::RING));
            }
        }
    }
    // A notch makes the rotation visible.
    let notch = shape.center + Vec2::from_angle(shape.rotation) * shape.radius;
    if let Some(pos) = cell_at(area, notch) {
        if is_empty_sky(buf, pos) || buf[pos].symbol() == "·" {
            buf[pos].set_char('•').set_style(Style::default().fg(theme::RING_NOTCH));
        }
    }
}

fn render_orb(shape: &Shape, color: [u8; 3], area: Rect, buf: &mut Buffer) {
    let reach = shape.radius * ORB_FADE;
    for row in 0..area.height {
        for col in 0..area.width {
            let cell_center = Point::new(
                (col as f64 + 0.5) * CELL_WIDTH_PX,
                (row as f64 + 0.5) * CELL_HEIGHT_PX,
            );
            let d = cell_center.distance(shape.center) / reach;
            if d >= 1.0 {
                continue;
            }
            let pos = (area.x + col, area.y + row);
            if !is_empty_sky(buf, pos) {
                continue;
            }
            let strength = (shape.opacity * ORB_GAIN * (1.0 - d)).clamp(0.0, 1.0);
            buf[pos].set_style(Style::default().bg(tint(color, strength)));
        }
    }
}

fn tint(color: [u8; 3], strength: f64) -> Color {
    let base = theme::BG_RGB;
    let mix = |i: usize| {
        (base[i] as f64 + (color[i] as f64 - base[i] as f64) * strength).round() as u8
    };
    Color::Rgb(mix(0), mix(1), mix(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field() -> DecorField {
        let mut rng = StdRng::seed_from_u64(11);
        DecorField::new(&mut rng, Viewport::new(800.0, 480.0))
    }

    fn rings(shapes: &[Shape]) -> Vec<&Shape> {
        shapes.iter().filter(|s| s.kind == ShapeKind::Ring).collect()
    }

    #[test]
    fn rings_appear_staggered() {
        let f = field();
        assert_eq!(rings(&f.shapes(1.0)).len(), 1);
        assert_eq!(rings(&f.shapes(4.0)).len(), 2);
        assert_eq!(rings(&f.shapes(7.0)).len(), 3);
    }

    #[test]
    fn ring_grows_then_shrinks_over_a_loop() {
        let f = field();
        let ring = &f.rings[0];
        let at = |t: f64| rings(&f.shapes(t))[0].radius;
        let mid = at(ring.duration / 2.0);
        assert!((mid - RING_SIZE / 2.0).abs() < 1e-6);
        assert!(at(ring.duration * 0.1) < mid);
        assert!(at(ring.duration * 0.9) < mid);
    }

    #[test]
    fn orbs_start_home_and_swing_back() {
        let f = field();
        let orb = &f.orbs[0];
        let home = ORB_HOME + Vec2::new(ORB_SIZE / 2.0, ORB_SIZE / 2.0);
        assert_eq!(f.shapes(0.0)[0].center, home);

        let out = f.shapes(orb.duration)[0].center;
        let target = orb.to + Vec2::new(ORB_SIZE / 2.0, ORB_SIZE / 2.0);
        assert!(out.distance(target) < 1e-6);

        let back = f.shapes(orb.duration * 2.0)[0].center;
        assert!(back.distance(home) < 1e-6);
        // The second orb waits at home for its delay.
        assert_eq!(f.shapes(ORB_STAGGER_S - 0.5)[1].center, home);
    }

    #[test]
    fn ring_skips_lit_cells() {
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);
        buf[(10, 4)].set_symbol("▀");
        let shape = Shape {
            kind: ShapeKind::Ring,
            center: Point::new(84.0, 72.0),
            radius: 4.0,
            rotation: 0.0,
            opacity: RING_OPACITY,
        };
        DecorWidget { shapes: &[shape] }.render(area, &mut buf);
        assert_eq!(buf[(10, 4)].symbol(), "▀");
    }

    #[test]
    fn orb_tints_nearby_empty_cells() {
        let area = Rect::new(0, 0, 30, 12);
        let mut buf = Buffer::empty(area);
        let shape = Shape {
            kind: ShapeKind::Orb(theme::ORB_INDIGO),
            center: Point::new(120.0, 96.0),
            radius: ORB_SIZE / 2.0,
            rotation: 0.0,
            opacity: ORB_OPACITY,
        };
        DecorWidget { shapes: &[shape] }.render(area, &mut buf);
        assert_ne!(buf[(15, 6)].bg, Color::Reset);
        assert_eq!(buf[(29, 0)].bg, Color::Reset);
    }
}
