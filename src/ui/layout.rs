use super::{header, theme};
use crate::app::App;
use crate::background::FrameStats;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Draws the header, the open sky, the status line and the footer.
pub fn draw_layout(f: &mut Frame, area: Rect, app: &App) {
    // Vertical: header | sky | status | footer
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // header
            Constraint::Min(0),    // sky
            Constraint::Length(1), // status
            Constraint::Length(1), // footer
        ])
        .split(area);

    header::draw_header(f, vert[0], app);
    draw_status(f, vert[2], &app.background.stats());
    draw_footer(f, vert[3], app);
}

fn status_text(stats: &FrameStats) -> String {
    let state = if stats.paused {
        "paused"
    } else if stats.running {
        "live"
    } else {
        "idle"
    };
    format!(
        " {} · {} tier · {} fps cap · ×{:.2} px · {} stars · {}/{} shooting · {} missed",
        state,
        stats.tier,
        stats.fps_cap,
        stats.pixel_ratio,
        stats.stars,
        stats.shooting,
        stats.max_shooting,
        stats.missed_spawns,
    )
}

fn draw_status(f: &mut Frame, area: Rect, stats: &FrameStats) {
    let line = Line::from(Span::styled(status_text(stats), theme::status_style(stats.paused)));
    f.render_widget(Paragraph::new(line), area);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    // Show flash message if active, otherwise normal footer
    if let Some(msg) = app.flash_message.as_ref().filter(|_| app.is_flashing()) {
        let footer = Line::from(vec![Span::styled(format!(" {} ", msg), theme::flash_style())]);
        f.render_widget(Paragraph::new(footer), area);
        return;
    }

    let footer = Line::from(vec![
        Span::styled(" [p]", theme::key_hint_style()),
        Span::styled(" Tier  ", theme::footer_style()),
        Span::styled("[t]", theme::key_hint_style()),
        Span::styled(" Twinkle  ", theme::footer_style()),
        Span::styled("[s]", theme::key_hint_style()),
        Span::styled(" Shooting stars  ", theme::footer_style()),
        Span::styled("[m]", theme::key_hint_style()),
        Span::styled(" Reduced motion  ", theme::footer_style()),
        Span::styled("[?]", theme::key_hint_style()),
        Span::styled(" Help  ", theme::footer_style()),
        Span::styled("[q]", theme::key_hint_style()),
        Span::styled(" Quit", theme::footer_style()),
    ]);

    f.render_widget(Paragraph::new(footer), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tier;

    #[test]
    fn status_reports_pause_and_shooters() {
        let stats = FrameStats {
            accepted: 10,
            dropped: 2,
            stars: 128,
            shooting: 1,
            max_shooting: 4,
            spawned: 3,
            missed_spawns: 0,
            fps_cap: 45,
            tier: Tier::Balanced,
            pixel_ratio: 0.5,
            paused: true,
            running: false,
        };
        let text = status_text(&stats);
        assert!(text.starts_with(" paused"));
        assert!(text.contains("balanced tier"));
        assert!(text.contains("1/4 shooting"));
        assert!(text.contains("×0.50 px"));
    }
}
