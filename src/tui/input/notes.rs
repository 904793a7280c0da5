use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::autosave::Clock;
use crate::model::DateKey;
use crate::swipe::{MoveOutcome, SwipeOutcome, TapOutcome};
use crate::tui::app::{App, Press, RowHit};

pub(super) fn handle_notes_key(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (KeyModifiers::NONE, KeyCode::Char('q')) => app.quit(),
        (KeyModifiers::NONE, KeyCode::Char('j')) | (_, KeyCode::Down) => move_cursor(app, 1),
        (KeyModifiers::NONE, KeyCode::Char('k')) | (_, KeyCode::Up) => move_cursor(app, -1),
        (_, KeyCode::Enter) => {
            if let Some(date) = app.selected_date() {
                tap_row(app, date);
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('d')) | (_, KeyCode::Delete) => {
            if let Some(date) = app.selected_date() {
                app.request_delete(date);
            }
        }
        (KeyModifiers::NONE, KeyCode::Char('t')) => {
            let today = app.today;
            app.open_day(today);
        }
        (_, KeyCode::Esc) => app.swipe.close_open_row(),
        _ => {}
    }
}

fn move_cursor(app: &mut App, delta: isize) {
    if app.days.is_empty() {
        return;
    }
    app.swipe.close_open_row();
    let max = app.days.len() - 1;
    app.notes_cursor = app.notes_cursor.saturating_add_signed(delta).min(max);
}

/// A tap on a row: closes it if open, otherwise opens that day.
fn tap_row(app: &mut App, date: DateKey) {
    if let Some(index) = app.days.iter().position(|d| d.date == date) {
        app.notes_cursor = index;
    }
    if app.swipe.tap(&date) == TapOutcome::PassThrough {
        app.swipe.close_open_row();
        app.open_day(date);
    }
}

/// Hand a gesture's delete request to the confirm prompt.
fn forward_delete(app: &mut App, outcome: SwipeOutcome<DateKey>) -> bool {
    match outcome {
        SwipeOutcome::DeleteRequested(date) => {
            app.request_delete(date);
            true
        }
        _ => false,
    }
}

fn row_at(app: &App, column: u16, row: u16) -> Option<RowHit> {
    app.row_hits.iter().copied().find(|hit| {
        row >= hit.area.y
            && row < hit.area.bottom()
            && column >= hit.area.x
            && column < hit.area.right()
    })
}

pub(super) fn handle_notes_mouse(app: &mut App, mouse: MouseEvent) {
    let now = app.clock.now_ms();
    let (x, y) = app.cell_to_px(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            // The release of the previous press was lost (e.g. outside the window)
            app.press = None;
            let Some(hit) = row_at(app, mouse.column, mouse.row) else {
                let stale = app.swipe.pointer_cancel();
                if !forward_delete(app, stale) {
                    app.swipe.close_open_row();
                }
                return;
            };
            let action_start = hit.area.right().saturating_sub(app.reveal_cols());
            if app.swipe.registry().is_open(&hit.date) && mouse.column >= action_start {
                app.swipe.pointer_cancel();
                app.request_delete(hit.date);
                return;
            }
            if let Some(stale) = app.swipe.pointer_start(hit.date, x, y, now)
                && forward_delete(app, stale)
            {
                app.swipe.pointer_cancel();
                return;
            }
            app.press = Some(Press {
                date: hit.date,
                column: mouse.column,
                abandoned: false,
            });
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if app.swipe.pointer_move(x, y, now) == MoveOutcome::Abandoned
                && let Some(press) = app.press.as_mut()
            {
                press.abandoned = true;
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            let Some(press) = app.press.take() else {
                return;
            };
            match app.swipe.pointer_end() {
                outcome @ SwipeOutcome::DeleteRequested(_) => {
                    forward_delete(app, outcome);
                }
                SwipeOutcome::Discarded(date) => tap_row(app, date),
                // Rows without a reveal never start a session
                SwipeOutcome::Aborted if !press.abandoned => tap_row(app, press.date),
                _ => {}
            }
        }
        MouseEventKind::ScrollDown => {
            app.swipe.pointer_cancel();
            app.press = None;
            move_cursor(app, 1);
        }
        MouseEventKind::ScrollUp => {
            app.swipe.pointer_cancel();
            app.press = None;
            move_cursor(app, -1);
        }
        _ => {}
    }
}
