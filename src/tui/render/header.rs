use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, View};
use crate::util::unicode::display_width;

/// Title line plus a separator rule
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let title_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let (title, hint) = match app.view {
        View::Notes => ("Notes".to_string(), "Swipe left to delete"),
        View::Day => {
            let title = app
                .editor
                .as_ref()
                .map(|ed| {
                    if ed.date() == app.today {
                        format!("Today \u{00B7} {}", ed.date().display_long())
                    } else {
                        ed.date().display_long()
                    }
                })
                .unwrap_or_default();
            (title, "PgUp/PgDn day  Esc back")
        }
    };

    let title = format!(" {}", title);
    let mut spans = vec![Span::styled(title.clone(), title_style)];
    let used = display_width(&title);
    let hint_width = display_width(hint) + 1;
    if used + hint_width < width {
        spans.push(Span::styled(" ".repeat(width - used - hint_width), dim_style));
        spans.push(Span::styled(format!("{} ", hint), dim_style));
    }

    let lines = vec![
        Line::from(spans),
        Line::from(Span::styled("\u{2500}".repeat(width), dim_style)),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}
