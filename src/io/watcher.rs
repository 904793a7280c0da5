use std::path::Path;
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::model::DateKey;

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug, PartialEq, Eq)]
pub enum DayEvent {
    /// Day files were created, modified or removed on disk.
    Changed(Vec<DateKey>),
}

/// Watches `<journal>/days/` so edits made by another process (for example
/// `ilo write`) reach an open day view.
pub struct DayWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<DayEvent>,
}

impl DayWatcher {
    pub fn start(days_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let Ok(event) = result else {
                    return;
                };
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }
                let dates = dates_from_paths(event.paths.iter().map(|p| p.as_path()));
                if !dates.is_empty() {
                    let _ = tx.send(DayEvent::Changed(dates));
                }
            },
            Config::default(),
        )?;

        watcher.watch(days_dir, RecursiveMode::NonRecursive)?;
        Ok(DayWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking: every date reported since the last poll, deduplicated.
    pub fn poll(&self) -> Vec<DateKey> {
        let mut dates = Vec::new();
        while let Ok(DayEvent::Changed(changed)) = self.rx.try_recv() {
            for date in changed {
                if !dates.contains(&date) {
                    dates.push(date);
                }
            }
        }
        dates
    }
}

/// Day keys for paths that look like `YYYY-MM-DD.json`. Temp files from
/// atomic writes are ignored.
fn dates_from_paths<'a>(paths: impl Iterator<Item = &'a Path>) -> Vec<DateKey> {
    let mut dates = Vec::new();
    for path in paths {
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(date) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.parse::<DateKey>().ok())
            && !dates.contains(&date)
        {
            dates.push(date);
        }
    }
    dates
}
