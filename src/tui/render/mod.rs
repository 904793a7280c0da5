pub mod confirm_popup;
pub mod day_view;
pub mod header;
pub mod notes_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, View};

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);

    match app.view {
        View::Notes => notes_view::render_notes_view(frame, app, chunks[1]),
        View::Day => day_view::render_day_view(frame, app, chunks[1]),
    }

    status_row::render_status_row(frame, app, chunks[2]);

    // Delete confirmation (rendered on top of everything)
    if app.confirm.is_some() {
        confirm_popup::render_confirm_popup(frame, app, frame.area());
    }
}

/// Keep `cursor` inside a window of `height` rows starting at `scroll`.
pub(super) fn scroll_to_cursor(scroll: usize, cursor: usize, height: usize) -> usize {
    if height == 0 {
        return scroll;
    }
    if cursor < scroll {
        cursor
    } else if cursor >= scroll + height {
        cursor + 1 - height
    } else {
        scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn notes_screen_has_header_and_hint() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_days(tmp.path(), vec![day_with("2025-03-03", &[(9, "x")])]);
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        let first = output.lines().next().unwrap();
        assert!(first.starts_with(" Notes"));
        assert!(first.ends_with("Swipe left to delete"));
        assert!(output.contains("Monday, March 3, 2025"));
    }

    #[test]
    fn delete_popup_draws_over_the_list() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_days(tmp.path(), vec![day_with("2025-03-03", &[(9, "x")])]);
        app.request_delete(date("2025-03-03"));
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(output.contains("Delete journal entry?"));
        assert!(output.contains("Are you sure you want to delete this journal entry?"));
    }

    #[test]
    fn day_screen_reports_save_state() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_days(tmp.path(), vec![]);
        app.open_day(date("2025-03-03"));
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(output.lines().next().unwrap().starts_with(" Monday, March 3, 2025"));
        assert!(output.lines().last().unwrap().ends_with("saved"));

        app.edit_focused("typing".to_string(), 6);
        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        assert!(output.lines().last().unwrap().ends_with("edited"));
        assert!(output.contains("00:00 \u{2022} typing"));
    }

    #[test]
    fn blur_shows_saved_without_an_in_between_state() {
        let tmp = TempDir::new().unwrap();
        let mut app = app_with_days(tmp.path(), vec![]);
        app.open_day(date("2025-03-03"));
        app.edit_focused("typing".to_string(), 6);
        app.focus_slot(crate::model::Hour::new(1).unwrap());

        let output = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &mut app));
        let status = output.lines().last().unwrap();
        assert!(status.ends_with("saved"));
        assert!(!status.contains("saving"));
        assert!(output.contains("00:00 \u{2502} typing"));
    }

    #[test]
    fn scroll_follows_cursor() {
        assert_eq!(scroll_to_cursor(0, 3, 10), 0);
        assert_eq!(scroll_to_cursor(0, 12, 10), 3);
        assert_eq!(scroll_to_cursor(5, 2, 10), 2);
        assert_eq!(scroll_to_cursor(4, 7, 0), 4);
    }
}
