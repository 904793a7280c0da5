mod confirm;
mod day;
mod notes;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};

use super::app::{App, View};

use confirm::handle_confirm;
use day::{handle_day_key, handle_day_mouse};
use notes::{handle_notes_key, handle_notes_mouse};

/// Handle a key event in the current view
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    // The delete popup intercepts all input
    if app.confirm.is_some() {
        handle_confirm(app, key);
        return;
    }

    app.status_message = None;
    match app.view {
        View::Notes => handle_notes_key(app, key),
        View::Day => handle_day_key(app, key),
    }
}

/// Handle a mouse event in the current view
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.confirm.is_some() {
        return;
    }
    match app.view {
        View::Notes => handle_notes_mouse(app, mouse),
        View::Day => handle_day_mouse(app, mouse),
    }
}
