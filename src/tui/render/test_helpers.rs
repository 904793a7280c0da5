use std::path::Path;

use chrono::Utc;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::store::MemoryStore;
use crate::model::{DateKey, Day, Hour, JournalConfig};
use crate::tui::app::App;

pub const TERM_W: u16 = 60;
pub const TERM_H: u16 = 12;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

pub fn date(s: &str) -> DateKey {
    s.parse().unwrap()
}

/// A day with one note per `(hour, text)` pair.
pub fn day_with(s: &str, notes: &[(u8, &str)]) -> Day {
    let mut day = Day::new(date(s));
    for (hour, text) in notes {
        day.upsert(Hour::new(*hour).unwrap(), text, Utc::now());
    }
    day
}

/// An app over an in-memory store where "today" is 2025-03-10.
pub fn app_with_days(journal_dir: &Path, days: Vec<Day>) -> App {
    App::new(
        Box::new(MemoryStore::with_days(days)),
        journal_dir,
        JournalConfig::default(),
        date("2025-03-10"),
    )
}
