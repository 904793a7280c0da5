use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::model::{HOURS_PER_DAY, Hour};
use crate::tui::app::App;
use crate::util::unicode::{grapheme_len, insert_at, remove_at, remove_before};

// ---------------------------------------------------------------------------
// Day view input
// ---------------------------------------------------------------------------

fn step_focus(app: &mut App, delta: i8) {
    let next = app.focus.get() as i8 + delta;
    if (0..HOURS_PER_DAY as i8).contains(&next)
        && let Ok(hour) = Hour::new(next as u8)
    {
        app.focus_slot(hour);
    }
}

fn type_text(app: &mut App, text: &str) {
    let value = insert_at(app.focused_text(), app.edit_cursor, text);
    let cursor = app.edit_cursor + grapheme_len(text);
    app.edit_focused(value, cursor);
}

pub(super) fn handle_day_key(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => app.close_day(),
        (_, KeyCode::Up) | (_, KeyCode::BackTab) => step_focus(app, -1),
        (_, KeyCode::Down) | (_, KeyCode::Tab) | (_, KeyCode::Enter) => step_focus(app, 1),
        (_, KeyCode::PageUp) => app.step_day(false),
        (_, KeyCode::PageDown) => app.step_day(true),
        (_, KeyCode::Left) => app.edit_cursor = app.edit_cursor.saturating_sub(1),
        (_, KeyCode::Right) => {
            app.edit_cursor = (app.edit_cursor + 1).min(grapheme_len(app.focused_text()));
        }
        (_, KeyCode::Home) => app.edit_cursor = 0,
        (_, KeyCode::End) => app.edit_cursor = grapheme_len(app.focused_text()),
        (_, KeyCode::Backspace) => {
            if let Some(value) = remove_before(app.focused_text(), app.edit_cursor) {
                let cursor = app.edit_cursor - 1;
                app.edit_focused(value, cursor);
            }
        }
        (_, KeyCode::Delete) => {
            if let Some(value) = remove_at(app.focused_text(), app.edit_cursor) {
                let cursor = app.edit_cursor;
                app.edit_focused(value, cursor);
            }
        }
        (m, KeyCode::Char(c)) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            type_text(app, c.encode_utf8(&mut [0; 4]));
        }
        _ => {}
    }
}

pub(super) fn handle_day_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let hit = app.slot_hits.iter().find(|(_, area)| {
                mouse.row >= area.y
                    && mouse.row < area.bottom()
                    && mouse.column >= area.x
                    && mouse.column < area.right()
            });
            if let Some(&(hour, _)) = hit {
                app.focus_slot(hour);
            }
        }
        MouseEventKind::ScrollDown => step_focus(app, 1),
        MouseEventKind::ScrollUp => step_focus(app, -1),
        _ => {}
    }
}
