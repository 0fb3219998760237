use kurbo::Point;

/// How new paint combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    #[default]
    SourceOver,
    /// Light adds up ("lighter" compositing).
    Additive,
}

/// An 8-bit color with a separate float opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f32) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }
}

/// A 2-D drawing surface.
///
/// Coordinates passed to the drawing calls are in CSS pixels; the surface
/// multiplies them by the scale set with [`Canvas::set_scale`].
pub trait Canvas {
    /// Reallocate the backing store. Clears the surface.
    fn resize(&mut self, width: u32, height: u32);
    fn set_scale(&mut self, scale: f64);
    fn clear(&mut self);
    /// Make everything drawn since the last clear visible. Surfaces that
    /// draw immediately have nothing to do.
    fn present(&mut self) {}
    fn blend(&self) -> Blend;
    fn set_blend(&mut self, blend: Blend);
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba);
    /// Radial gradient from `color` at the center to transparent at `radius`.
    fn fill_glow(&mut self, center: Point, radius: f64, color: Rgba);
    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba);
    /// Tapered stroke: `width` and full opacity at `head`, zero at `tail`.
    fn stroke_trail(&mut self, head: Point, tail: Point, width: f64, color: Rgba);
}
