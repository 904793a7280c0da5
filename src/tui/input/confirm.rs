use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::App;

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('y')) | (KeyModifiers::SHIFT, KeyCode::Char('Y')) => {
            app.confirm_delete();
        }
        // Cancel: n or Esc. The row slides shut again.
        (KeyModifiers::NONE, KeyCode::Char('n')) | (_, KeyCode::Esc) => {
            app.cancel_delete();
            app.swipe.close_open_row();
        }
        _ => {}
    }
}
