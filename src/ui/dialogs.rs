use super::theme;
use crate::app::App;
use crate::types::DialogKind;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

pub fn draw_dialog(f: &mut Frame, area: Rect, app: &App) {
    match &app.dialog {
        Some(DialogKind::Help) => draw_help(f, area),
        None => {}
    }
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1])[1]
}

fn key_line(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<15}", key), theme::key_hint_style()),
        Span::styled(action, Style::default().fg(theme::TEXT)),
    ])
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    ))
}

fn draw_help(f: &mut Frame, area: Rect) {
    let popup = centered_rect(60, 19, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .title(Line::from(vec![Span::styled(
            " Help - Starglow ",
            theme::panel_title_style(),
        )]))
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .style(Style::default().bg(theme::SURFACE));

    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let lines = vec![
        Line::from(""),
        section("  SKY"),
        key_line("p", "Cycle quality tier (high / balanced / low)"),
        key_line("t", "Toggle twinkling"),
        key_line("s", "Toggle shooting stars"),
        key_line("c", "Toggle constellation links"),
        key_line("d", "Toggle floating decor"),
        key_line("m", "Toggle reduced motion"),
        Line::from(""),
        section("  GLOBAL"),
        key_line("q / Esc", "Quit"),
        key_line("Ctrl+C", "Force quit"),
        key_line("?", "Toggle help"),
        Line::from(""),
        Line::from(Span::styled(
            "  The sky pauses while the terminal is unfocused.",
            Style::default().fg(theme::TEXT_DIM),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "  Press any key to close",
            Style::default().fg(theme::TEXT_DIM),
        )),
    ];

    f.render_widget(Paragraph::new(lines), inner);
}
