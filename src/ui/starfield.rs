use super::theme;
use crate::background::PixelCanvas;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;
use ratatui::Frame;

const HALF_BLOCK: &str = "▀";
/// Channel level below which a half cell counts as empty sky.
const DARK: f32 = 0.02;

pub fn draw_starfield(f: &mut Frame, area: Rect, canvas: &PixelCanvas) {
    let widget = StarfieldWidget { canvas };
    f.render_widget(widget, area);
}

/// Presents the canvas as half-block cells: each cell shows two vertically
/// stacked samples, the upper one as foreground and the lower as background.
struct StarfieldWidget<'a> {
    canvas: &'a PixelCanvas,
}

impl Widget for StarfieldWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let (cw, ch) = (self.canvas.width(), self.canvas.height());
        let rows = area.height as u32 * 2;
        let cols = area.width as u32;

        for row in 0..area.height {
            for col in 0..area.width {
                let cell = &mut buf[(area.x + col, area.y + row)];
                if cw == 0 || ch == 0 {
                    cell.set_char(' ').set_style(Style::default().bg(theme::BG));
                    continue;
                }
                let x0 = col as u32 * cw / cols;
                let x1 = ((col as u32 + 1) * cw / cols).max(x0 + 1);
                let top = sample(self.canvas, x0, x1, row as u32 * 2, rows);
                let bottom = sample(self.canvas, x0, x1, row as u32 * 2 + 1, rows);

                if is_dark(top) && is_dark(bottom) {
                    cell.set_char(' ').set_style(Style::default().bg(theme::BG));
                } else {
                    cell.set_symbol(HALF_BLOCK)
                        .set_style(Style::default().fg(to_color(top)).bg(to_color(bottom)));
                }
            }
        }
    }
}

/// Brightest backing pixel under half-row `half` of `rows`.
fn sample(canvas: &PixelCanvas, x0: u32, x1: u32, half: u32, rows: u32) -> [f32; 3] {
    let ch = canvas.height();
    let y0 = half * ch / rows;
    let y1 = ((half + 1) * ch / rows).max(y0 + 1);
    canvas.max_in(x0, y0, x1, y1)
}

fn is_dark(c: [f32; 3]) -> bool {
    c.iter().all(|v| *v < DARK)
}

/// Light over the theme background.
fn to_color(c: [f32; 3]) -> Color {
    let [br, bg, bb] = theme::BG_RGB;
    let mix = |light: f32, base: u8| -> u8 {
        (base as f32 + light.min(1.0) * 255.0).clamp(0.0, 255.0) as u8
    };
    Color::Rgb(mix(c[0], br), mix(c[1], bg), mix(c[2], bb))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::canvas::{Canvas, Rgba};
    use kurbo::Point;

    #[test]
    fn lit_pixels_become_half_blocks() {
        let mut canvas = PixelCanvas::new();
        canvas.resize(40, 40);
        canvas.fill_circle(Point::new(5.0, 5.0), 3.0, Rgba::rgb(255, 255, 255));
        canvas.present();

        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        StarfieldWidget { canvas: &canvas }.render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), HALF_BLOCK);
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(255, 255, 255));
        assert_eq!(buf[(3, 1)].symbol(), " ");
        assert_eq!(buf[(3, 1)].bg, theme::BG);
    }

    #[test]
    fn empty_canvas_paints_background() {
        let canvas = PixelCanvas::new();
        let area = Rect::new(0, 0, 3, 3);
        let mut buf = Buffer::empty(area);
        StarfieldWidget { canvas: &canvas }.render(area, &mut buf);
        assert_eq!(buf[(1, 1)].bg, theme::BG);
    }
}
