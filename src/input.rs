use crate::app::App;
use crossterm::event::{KeyCode, KeyEvent};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Any key closes an open dialog
    if app.dialog.is_some() {
        app.close_dialog();
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('?') => app.open_help(),
        KeyCode::Char('p') => app.cycle_tier(),
        KeyCode::Char('t') => app.toggle_twinkle(),
        KeyCode::Char('s') => app.toggle_shooting_stars(),
        KeyCode::Char('d') => app.toggle_decor(),
        KeyCode::Char('c') => app.toggle_constellations(),
        KeyCode::Char('m') => app.toggle_reduced_motion(),
        _ => {}
    }
}
