use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::App;

/// Render the delete confirmation popup
pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(confirm) = app.confirm else {
        return;
    };

    let bg = app.theme.background;
    let header_style = Style::default()
        .fg(app.theme.red)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let text_style = Style::default().fg(app.theme.text).bg(bg);
    let bright_style = Style::default()
        .fg(app.theme.text_bright)
        .bg(bg)
        .add_modifier(Modifier::BOLD);
    let dim_style = Style::default().fg(app.theme.dim).bg(bg);

    let lines = vec![
        Line::from(Span::styled(" Delete journal entry?", header_style)),
        Line::from(""),
        Line::from(Span::styled(
            "  Are you sure you want to delete this journal entry?",
            text_style,
        )),
        Line::from(vec![
            Span::styled("  ", text_style),
            Span::styled(confirm.date.display_long(), bright_style),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  y", bright_style),
            Span::styled(" delete   ", dim_style),
            Span::styled("n", bright_style),
            Span::styled(" cancel", dim_style),
        ]),
    ];

    let popup_w: u16 = 58.min(area.width.saturating_sub(2));
    let popup_h: u16 = (lines.len() as u16 + 2).min(area.height);
    let popup = Rect::new(
        area.x + area.width.saturating_sub(popup_w) / 2,
        area.y + area.height.saturating_sub(popup_h) / 2,
        popup_w,
        popup_h,
    );

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.red).bg(bg))
        .style(Style::default().bg(bg));
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
