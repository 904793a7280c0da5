use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Day;
use crate::tui::app::{App, RowHit};
use crate::util::unicode::{clip_to_width, display_width, skip_width};

use super::scroll_to_cursor;

const DELETE_LABEL: &str = "Delete";

/// Render the list of days with notes, newest first
pub fn render_notes_view(frame: &mut Frame, app: &mut App, area: Rect) {
    app.row_hits.clear();
    if app.days.is_empty() {
        render_empty(frame, app, area);
        return;
    }

    let height = area.height as usize;
    app.notes_scroll = scroll_to_cursor(app.notes_scroll, app.notes_cursor, height);

    let mut hits = Vec::new();
    let mut lines = Vec::new();
    for (row, (index, day)) in app
        .days
        .iter()
        .enumerate()
        .skip(app.notes_scroll)
        .take(height)
        .enumerate()
    {
        hits.push(RowHit {
            date: day.date,
            area: Rect::new(area.x, area.y + row as u16, area.width, 1),
        });
        lines.push(row_line(app, day, index == app.notes_cursor, area.width as usize));
    }
    frame.render_widget(
        Paragraph::new(lines).style(Style::default().bg(app.theme.background)),
        area,
    );
    app.row_hits = hits;
}

fn render_empty(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let bright = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let top = area.height.saturating_sub(3) / 2;
    let mut lines: Vec<Line> = (0..top).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled("No notes yet", bright)));
    lines.push(Line::from(Span::styled(
        "Start writing in your journal to see notes here",
        dim,
    )));
    lines.push(Line::from(Span::styled("Press t to write today", dim)));
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .style(Style::default().bg(bg)),
        area,
    );
}

/// One row: the sliding day label, plus whatever the slide has uncovered
/// on the right.
fn row_line(app: &App, day: &Day, selected: bool, width: usize) -> Line<'static> {
    let bg = app.theme.background;
    let (offset, action_visible) = app
        .row_paints
        .get(&day.date)
        .map(|paint| {
            let paint = paint.borrow();
            (paint.offset(), paint.background_visible)
        })
        .unwrap_or((0.0, false));
    let shift = ((-offset / app.cell_width()).round().max(0.0) as usize).min(width);

    let row_style = if selected {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };

    let label = format!(" {}", day.date.display_long());
    let tag = if day.date == app.today { "Today " } else { "" };
    let pad = width.saturating_sub(display_width(&label) + display_width(tag));
    let body = format!("{}{}{}", label, " ".repeat(pad), tag);

    // Sliding left pushes the row's leading cells off screen
    let content_w = width - shift;
    let shown = clip_to_width(skip_width(&body, shift), content_w);
    let shown = format!(
        "{}{}",
        shown,
        " ".repeat(content_w.saturating_sub(display_width(shown)))
    );

    let mut spans = Vec::new();
    if !tag.is_empty() && shown.ends_with(tag) {
        let split = shown.len() - tag.len();
        spans.push(Span::styled(shown[..split].to_string(), row_style));
        spans.push(Span::styled(
            tag.to_string(),
            row_style.fg(app.theme.highlight),
        ));
    } else {
        spans.push(Span::styled(shown, row_style));
    }

    if shift > 0 {
        if action_visible {
            let action_style = Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.red)
                .add_modifier(Modifier::BOLD);
            let text = if shift >= DELETE_LABEL.len() {
                let left = (shift - DELETE_LABEL.len()) / 2;
                format!(
                    "{}{}{}",
                    " ".repeat(left),
                    DELETE_LABEL,
                    " ".repeat(shift - DELETE_LABEL.len() - left)
                )
            } else {
                " ".repeat(shift)
            };
            spans.push(Span::styled(text, action_style));
        } else {
            spans.push(Span::styled(" ".repeat(shift), Style::default().bg(bg)));
        }
    }

    Line::from(spans)
}
