pub mod decor;
pub mod dialogs;
pub mod header;
pub mod layout;
pub mod starfield;
pub mod theme;

use crate::app::App;
use ratatui::Frame;

/// Master render function: draws the sky, decor, layout, then modal overlay.
pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    // Layer 0: star field canvas
    starfield::draw_starfield(f, area, &app.canvas);

    // Layer 1: floating decor, only when the resolved config allows it
    if app.background.config().decor_enabled {
        decor::draw_decor(f, area, &app.decor, app.decor_secs());
    }

    // Layer 2: header, status and footer
    layout::draw_layout(f, area, app);

    // Layer 3: modal dialog overlay (if any)
    if app.dialog.is_some() {
        dialogs::draw_dialog(f, area, app);
    }
}
