use super::canvas::{Blend, Canvas, Rgba};
use kurbo::{Circle, Line, Point, Shape};
use vello_cpu::kurbo::{Affine, BezPath, Stroke};
use vello_cpu::peniko::{BlendMode, Color, Compose, Gradient, Mix};
use vello_cpu::{Pixmap, RenderContext};

/// Curve flattening tolerance in CSS pixels.
const TOLERANCE: f64 = 0.1;

/// Software [`Canvas`] rasterized by `vello_cpu`.
///
/// Drawing calls are recorded into a render context and only land in the
/// pixmap on [`Canvas::present`]. The pixmap starts transparent, so its
/// premultiplied channels are the light painted into each pixel.
pub struct PixelCanvas {
    surface: Option<Surface>,
    scale: f64,
    blend: Blend,
}

struct Surface {
    ctx: RenderContext,
    pixmap: Pixmap,
}

impl PixelCanvas {
    pub fn new() -> Self {
        Self {
            surface: None,
            scale: 1.0,
            blend: Blend::SourceOver,
        }
    }

    pub fn width(&self) -> u32 {
        self.surface
            .as_ref()
            .map_or(0, |s| u32::from(s.pixmap.width()))
    }

    pub fn height(&self) -> u32 {
        self.surface
            .as_ref()
            .map_or(0, |s| u32::from(s.pixmap.height()))
    }

    /// Light at a backing pixel, or black outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> [f32; 3] {
        if x >= self.width() || y >= self.height() {
            return [0.0; 3];
        }
        self.max_in(x, y, x + 1, y + 1)
    }

    /// Brightest value per channel across a backing-pixel rectangle.
    pub fn max_in(&self, x0: u32, y0: u32, x1: u32, y1: u32) -> [f32; 3] {
        let Some(surface) = &self.surface else {
            return [0.0; 3];
        };
        let width = u32::from(surface.pixmap.width());
        let height = u32::from(surface.pixmap.height());
        let data = surface.pixmap.data_as_u8_slice();

        let mut out = [0u8; 3];
        for y in y0..y1.min(height) {
            for x in x0..x1.min(width) {
                let i = ((y * width + x) * 4) as usize;
                for c in 0..3 {
                    out[c] = out[c].max(data[i + c]);
                }
            }
        }
        out.map(|v| f32::from(v) / 255.0)
    }

    /// The render context primed with the current scale and blend mode.
    fn context(&mut self) -> Option<&mut RenderContext> {
        let transform = Affine::scale(self.scale);
        let mode = blend_mode(self.blend);
        let surface = self.surface.as_mut()?;
        surface.ctx.set_transform(transform);
        surface.ctx.set_paint_transform(Affine::IDENTITY);
        surface.ctx.set_blend_mode(mode);
        Some(&mut surface.ctx)
    }
}

impl Default for PixelCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas for PixelCanvas {
    fn resize(&mut self, width: u32, height: u32) {
        let w = u16::try_from(width).unwrap_or(u16::MAX);
        let h = u16::try_from(height).unwrap_or(u16::MAX);
        self.surface = (w > 0 && h > 0).then(|| Surface {
            ctx: RenderContext::new(w, h),
            pixmap: Pixmap::new(w, h),
        });
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn clear(&mut self) {
        if let Some(surface) = &mut self.surface {
            surface.ctx.reset();
            surface.pixmap.data_as_u8_slice_mut().fill(0);
        }
    }

    fn present(&mut self) {
        if let Some(Surface { ctx, pixmap }) = &mut self.surface {
            ctx.flush();
            ctx.render_to_pixmap(pixmap);
        }
    }

    fn blend(&self) -> Blend {
        self.blend
    }

    fn set_blend(&mut self, blend: Blend) {
        self.blend = blend;
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) {
        if !(radius > 0.0) || color.a <= 0.0 {
            return;
        }
        let Some(ctx) = self.context() else {
            return;
        };
        ctx.set_paint(paint(color, color.a));
        ctx.fill_path(&to_path(&Circle::new(center, radius)));
    }

    fn fill_glow(&mut self, center: Point, radius: f64, color: Rgba) {
        if !(radius > 0.0) || color.a <= 0.0 {
            return;
        }
        let Some(ctx) = self.context() else {
            return;
        };
        // The middle stop bends the ramp towards a squared falloff.
        let gradient = Gradient::new_radial(center, radius as f32).with_stops([
            paint(color, color.a),
            paint(color, color.a * 0.25),
            paint(color, 0.0),
        ]);
        ctx.set_paint(gradient);
        ctx.fill_path(&to_path(&Circle::new(center, radius)));
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba) {
        if !(width > 0.0) || color.a <= 0.0 {
            return;
        }
        let Some(ctx) = self.context() else {
            return;
        };
        ctx.set_stroke(Stroke::new(width));
        ctx.set_paint(paint(color, color.a));
        ctx.stroke_path(&to_path(&Line::new(from, to)));
    }

    fn stroke_trail(&mut self, head: Point, tail: Point, width: f64, color: Rgba) {
        let axis = tail - head;
        let length = axis.hypot();
        if !(length > 0.0) || !(width > 0.0) || color.a <= 0.0 {
            return;
        }
        let Some(ctx) = self.context() else {
            return;
        };
        let normal = axis.turn_90() * (width * 0.5 / length);
        let mut wedge = BezPath::new();
        wedge.move_to(head + normal);
        wedge.line_to(tail);
        wedge.line_to(head - normal);
        wedge.close_path();

        let gradient =
            Gradient::new_linear(head, tail).with_stops([paint(color, color.a), paint(color, 0.0)]);
        ctx.set_paint(gradient);
        ctx.fill_path(&wedge);
    }
}

fn blend_mode(blend: Blend) -> BlendMode {
    match blend {
        Blend::SourceOver => BlendMode::default(),
        Blend::Additive => BlendMode::new(Mix::Normal, Compose::Plus),
    }
}

fn paint(color: Rgba, alpha: f32) -> Color {
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::from_rgba8(color.r, color.g, color.b, a)
}

fn to_path(shape: &impl Shape) -> BezPath {
    let mut path = BezPath::new();
    for el in shape.path_elements(TOLERANCE) {
        path.push(el);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    fn canvas(w: u32, h: u32) -> PixelCanvas {
        let mut c = PixelCanvas::new();
        c.resize(w, h);
        c
    }

    #[test]
    fn nothing_lands_before_present() {
        let mut c = canvas(20, 20);
        c.fill_circle(Point::new(10.0, 10.0), 4.0, WHITE);
        assert_eq!(c.pixel(10, 10), [0.0; 3]);
        c.present();
        assert!(c.pixel(10, 10)[0] > 0.99);
    }

    #[test]
    fn circle_lights_its_center_only() {
        let mut c = canvas(20, 20);
        c.fill_circle(Point::new(10.0, 10.0), 2.0, WHITE);
        c.present();
        assert!(c.pixel(10, 10)[0] > 0.99);
        assert_eq!(c.pixel(0, 0), [0.0; 3]);
        assert_eq!(c.pixel(19, 10), [0.0; 3]);
    }

    #[test]
    fn scale_maps_css_to_backing_pixels() {
        let mut c = canvas(40, 40);
        c.set_scale(2.0);
        c.fill_circle(Point::new(10.0, 10.0), 1.0, WHITE);
        c.present();
        assert!(c.pixel(20, 20)[0] > 0.99);
        assert_eq!(c.pixel(10, 10), [0.0; 3]);
    }

    #[test]
    fn additive_paint_accumulates() {
        let mut c = canvas(10, 10);
        c.set_blend(Blend::Additive);
        let half = Rgba::rgb(255, 0, 0).with_alpha(0.5);
        c.fill_circle(Point::new(5.0, 5.0), 2.0, half);
        c.fill_circle(Point::new(5.0, 5.0), 2.0, half);
        c.present();
        assert!((c.pixel(5, 5)[0] - 1.0).abs() < 0.02);

        c.clear();
        c.set_blend(Blend::SourceOver);
        c.fill_circle(Point::new(5.0, 5.0), 2.0, half);
        c.fill_circle(Point::new(5.0, 5.0), 2.0, half);
        c.present();
        assert!((c.pixel(5, 5)[0] - 0.75).abs() < 0.02);
    }

    #[test]
    fn clear_drops_recorded_paint() {
        let mut c = canvas(10, 10);
        c.fill_circle(Point::new(5.0, 5.0), 3.0, WHITE);
        c.present();
        c.clear();
        c.present();
        assert_eq!(c.max_in(0, 0, 10, 10), [0.0; 3]);
    }

    #[test]
    fn trail_fades_towards_tail() {
        let mut c = canvas(100, 10);
        c.stroke_trail(Point::new(90.0, 5.5), Point::new(10.0, 5.5), 3.0, WHITE);
        c.present();
        let head = c.pixel(88, 5)[0];
        let mid = c.pixel(50, 5)[0];
        let tail = c.pixel(11, 5)[0];
        assert!(head > mid && mid > tail);
        assert!(tail < 0.1);
    }

    #[test]
    fn glow_falls_off_with_distance() {
        let mut c = canvas(30, 30);
        c.fill_glow(Point::new(15.0, 15.0), 10.0, WHITE);
        c.present();
        assert!(c.pixel(15, 15)[0] > c.pixel(19, 15)[0]);
        assert_eq!(c.pixel(27, 15), [0.0; 3]);
    }

    #[test]
    fn max_in_samples_brightest_pixel() {
        let mut c = canvas(8, 8);
        c.fill_circle(Point::new(6.5, 6.5), 0.5, WHITE);
        c.present();
        assert!(c.max_in(4, 4, 8, 8)[1] > 0.5);
        assert_eq!(c.max_in(0, 0, 4, 4), [0.0; 3]);
    }

    #[test]
    fn drawing_off_surface_is_ignored() {
        let mut c = canvas(10, 10);
        c.fill_circle(Point::new(-50.0, -50.0), 3.0, WHITE);
        c.stroke_line(Point::new(-20.0, 50.0), Point::new(-5.0, 60.0), 1.0, WHITE);
        c.present();
        assert_eq!(c.max_in(0, 0, 10, 10), [0.0; 3]);
    }

    #[test]
    fn zero_sized_surface_has_no_backing_store() {
        let mut c = canvas(0, 12);
        c.fill_circle(Point::new(1.0, 1.0), 3.0, WHITE);
        c.present();
        assert_eq!((c.width(), c.height()), (0, 0));
        assert_eq!(c.pixel(0, 0), [0.0; 3]);
    }
}
