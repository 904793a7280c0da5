use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, View};
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let (right, right_color) = match (app.view, app.editor.as_ref()) {
        (View::Day, Some(editor)) if editor.has_unsaved() => ("edited", app.theme.orange),
        (View::Day, Some(_)) => ("saved", app.theme.green),
        _ => ("j/k move  Enter open  d delete  t today  q quit", app.theme.dim),
    };

    let mut spans = Vec::new();
    let right_width = display_width(right) + 1;
    let left_room = width.saturating_sub(right_width + 1);
    let left = match &app.status_message {
        Some(msg) => {
            let msg = truncate_to_width(msg, left_room.saturating_sub(1));
            spans.push(Span::styled(
                format!(" {}", msg),
                Style::default().fg(app.theme.red).bg(bg),
            ));
            display_width(&msg) + 1
        }
        None => 0,
    };

    if left + right_width <= width {
        spans.push(Span::styled(
            " ".repeat(width - left - right_width),
            Style::default().bg(bg),
        ));
        spans.push(Span::styled(
            format!("{} ", right),
            Style::default().fg(right_color).bg(bg),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}
