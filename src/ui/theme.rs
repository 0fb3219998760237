use ratatui::style::{Color, Modifier, Style};

// ── Base palette ────────────────────────────────────────────────
pub const BG_RGB: [u8; 3] = [6, 6, 12];
pub const BG: Color = Color::Rgb(BG_RGB[0], BG_RGB[1], BG_RGB[2]);
pub const SURFACE: Color = Color::Rgb(18, 18, 24);
pub const BORDER_FOCUS: Color = Color::Rgb(140, 140, 160);

pub const TEXT: Color = Color::Rgb(235, 235, 235);
pub const TEXT_DIM: Color = Color::Rgb(130, 130, 140);
pub const ACCENT: Color = Color::Rgb(165, 168, 255);
pub const ACCENT_WARM: Color = Color::Rgb(244, 176, 255);

pub const SUCCESS: Color = Color::Rgb(0, 255, 0);
pub const WARNING: Color = Color::Rgb(200, 200, 200);

// ── Decor ───────────────────────────────────────────────────────
pub const RING: Color = Color::Rgb(70, 72, 150);
pub const RING_NOTCH: Color = Color::Rgb(110, 112, 210);
pub const ORB_INDIGO: [u8; 3] = [99, 102, 241];
pub const ORB_VIOLET: [u8; 3] = [139, 92, 246];

// ── Composite styles ────────────────────────────────────────────
pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn eyebrow_style() -> Style {
    Style::default().fg(ACCENT_WARM)
}

pub fn subtitle_style() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn panel_title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn key_hint_style() -> Style {
    Style::default()
        .fg(ACCENT_WARM)
        .add_modifier(Modifier::BOLD)
}

pub fn flash_style() -> Style {
    Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD)
}

pub fn status_style(paused: bool) -> Style {
    if paused {
        Style::default().fg(WARNING).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT)
    }
}

pub fn border_style() -> Style {
    Style::default().fg(BORDER_FOCUS)
}

pub fn footer_style() -> Style {
    Style::default().fg(TEXT_DIM)
}
