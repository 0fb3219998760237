use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use super::theme;

const SPARKLE_CHARS: &[char] = &['.', '+', '*', '+', '.', ' '];

pub fn draw_header(f: &mut Frame, area: Rect, app: &crate::app::App) {
    f.render_widget(Paragraph::new(header_lines(app.tick)), area);
}

fn header_lines(tick: u64) -> Vec<Line<'static>> {
    let tick = tick as usize;

    // Sparkle animation: cycle through characters at different phases
    let left_sparkle = SPARKLE_CHARS[tick / 4 % SPARKLE_CHARS.len()];
    let right_sparkle = SPARKLE_CHARS[(tick / 4 + 3) % SPARKLE_CHARS.len()];

    vec![
        Line::from(vec![Span::styled("  AMBIENT NIGHT SKY", theme::eyebrow_style())]),
        Line::from(vec![Span::styled(
            format!("  {} S t a r g l o w {}", left_sparkle, right_sparkle),
            theme::title_style(),
        )]),
        Line::from(vec![Span::styled(
            "  Drifting stars and the odd meteor, right in your terminal.",
            theme::subtitle_style(),
        )]),
    ]
}
