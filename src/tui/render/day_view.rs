use chrono::{Local, Timelike};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_segmentation::UnicodeSegmentation;

use crate::model::Hour;
use crate::tui::app::App;
use crate::util::unicode::{clip_to_width, display_width, skip_width, truncate_to_width};

use super::scroll_to_cursor;

/// "07:00 │ " before each slot's text
const GUTTER: usize = 8;

/// Split `text` around grapheme `cursor`: before, the grapheme under the
/// cursor (empty at the end), after.
fn split_at_cursor(text: &str, cursor: usize) -> (&str, &str, &str) {
    let mut bounds = text.grapheme_indices(true).skip(cursor);
    match bounds.next() {
        Some((start, g)) => {
            let end = start + g.len();
            (&text[..start], &text[start..end], &text[end..])
        }
        None => (text, "", ""),
    }
}

/// Render the 24 hour slots of the open day
pub fn render_day_view(frame: &mut Frame, app: &mut App, area: Rect) {
    app.slot_hits.clear();
    let height = area.height as usize;
    app.day_scroll = scroll_to_cursor(app.day_scroll, app.focus.index(), height);

    let Some(editor) = app.editor.as_ref() else {
        return;
    };
    let bg = app.theme.background;
    let text_w = (area.width as usize).saturating_sub(GUTTER);
    let now_hour = (editor.date() == app.today).then(|| Local::now().hour() as usize);

    let mut hits = Vec::new();
    let mut lines = Vec::new();
    for (row, hour) in Hour::all().skip(app.day_scroll).take(height).enumerate() {
        hits.push((
            hour,
            Rect::new(area.x, area.y + row as u16, area.width, 1),
        ));

        let focused = hour == app.focus;
        let slot = editor.slot(hour);
        let line_bg = if focused { app.theme.selection_bg } else { bg };
        let label_fg = if now_hour == Some(hour.index()) {
            app.theme.highlight
        } else {
            app.theme.dim
        };
        let text_style = Style::default()
            .fg(if focused {
                app.theme.text_bright
            } else {
                app.theme.text
            })
            .bg(line_bg);
        // Writes complete within the tick that starts them, so a slot is
        // either waiting on its debounce or clean when drawn
        let marker = if slot.is_dirty() { "\u{2022}" } else { "\u{2502}" };

        let mut spans = vec![Span::styled(
            format!("{} {} ", hour.label(), marker),
            Style::default().fg(label_fg).bg(line_bg),
        )];

        if focused {
            spans.extend(focused_spans(app, slot.value(), text_w, text_style));
        } else {
            spans.push(Span::styled(
                truncate_to_width(slot.value(), text_w),
                text_style,
            ));
        }

        // Fill the rest of the row so the selection band spans the width
        let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let fill = (area.width as usize).saturating_sub(used);
        spans.push(Span::styled(" ".repeat(fill), Style::default().bg(line_bg)));
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
    app.slot_hits = hits;
}

/// The focused slot's text with a block cursor, scrolled sideways so the
/// cursor stays in view.
fn focused_spans(app: &App, text: &str, width: usize, style: Style) -> Vec<Span<'static>> {
    let cursor_style = Style::default()
        .fg(app.theme.background)
        .bg(app.theme.highlight)
        .add_modifier(Modifier::BOLD);
    let (before, at, after) = split_at_cursor(text, app.edit_cursor);

    let before_w = display_width(before);
    let hscroll = before_w.saturating_sub(width.saturating_sub(1));
    let before = skip_width(before, hscroll);
    let room = width.saturating_sub(display_width(before));

    let mut spans = vec![Span::styled(before.to_string(), style)];
    if room == 0 {
        return spans;
    }
    let at = if at.is_empty() { " " } else { at };
    spans.push(Span::styled(at.to_string(), cursor_style));
    let room = room.saturating_sub(display_width(at));
    spans.push(Span::styled(clip_to_width(after, room).to_string(), style));
    spans
}
