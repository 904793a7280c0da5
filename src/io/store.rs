use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;

use crate::io::lock::{DayLock, LockError};
use crate::model::{DateKey, Day, Entry, Hour};

/// Error type for persistence operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// The persistence port: everything the journal needs from storage.
///
/// `save_entry` is an idempotent upsert keyed by (date, hour). Empty content
/// is stored as a value; removing data only happens through `delete_day`.
pub trait JournalStore {
    /// Every stored day, newest first.
    fn load_all_days(&self) -> Result<Vec<Day>, StoreError>;
    fn load_day(&self, date: DateKey) -> Result<Option<Day>, StoreError>;
    fn save_entry(&mut self, date: DateKey, hour: Hour, content: &str)
    -> Result<Entry, StoreError>;
    fn delete_day(&mut self, date: DateKey) -> Result<(), StoreError>;
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// One pretty-printed JSON file per day under `<journal>/days/`.
#[derive(Debug, Clone)]
pub struct FileStore {
    journal_dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the store rooted at `journal_dir`.
    pub fn open(journal_dir: &Path) -> Result<Self, StoreError> {
        let days = journal_dir.join("days");
        fs::create_dir_all(&days).map_err(|e| StoreError::Write {
            path: days.clone(),
            source: e,
        })?;
        Ok(FileStore {
            journal_dir: journal_dir.to_path_buf(),
        })
    }

    pub fn journal_dir(&self) -> &Path {
        &self.journal_dir
    }

    pub fn days_dir(&self) -> PathBuf {
        self.journal_dir.join("days")
    }

    pub fn day_path(&self, date: DateKey) -> PathBuf {
        self.days_dir().join(format!("{}.json", date))
    }

    /// Load every day file. Files that fail to read or parse are returned
    /// separately so callers can warn about them without losing the rest.
    pub fn scan(&self) -> Result<(Vec<Day>, Vec<StoreError>), StoreError> {
        let dir = self.days_dir();
        let read_dir = match fs::read_dir(&dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok((Vec::new(), Vec::new())),
            Err(e) => {
                return Err(StoreError::Read {
                    path: dir,
                    source: e,
                });
            }
        };

        let mut days = Vec::new();
        let mut skipped = Vec::new();
        for dir_entry in read_dir.flatten() {
            let path = dir_entry.path();
            let is_day_file = path.extension().and_then(|e| e.to_str()) == Some("json")
                && path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .is_some_and(|s| s.parse::<DateKey>().is_ok());
            if !is_day_file {
                continue;
            }
            match read_day_file(&path) {
                Ok(day) => days.push(day),
                Err(e) => skipped.push(e),
            }
        }
        days.sort_by(|a, b| b.date.cmp(&a.date));
        Ok((days, skipped))
    }
}

fn read_day_file(path: &Path) -> Result<Day, StoreError> {
    let text = fs::read_to_string(path).map_err(|e| StoreError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut day: Day = serde_json::from_str(&text).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    day.normalize();
    Ok(day)
}

fn write_day_file(path: &Path, day: &Day) -> Result<(), StoreError> {
    let mut json = serde_json::to_string_pretty(day).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;
    json.push('\n');
    atomic_write(path, json.as_bytes()).map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        source: e,
    })
}

impl JournalStore for FileStore {
    fn load_all_days(&self) -> Result<Vec<Day>, StoreError> {
        self.scan().map(|(days, _skipped)| days)
    }

    fn load_day(&self, date: DateKey) -> Result<Option<Day>, StoreError> {
        let path = self.day_path(date);
        if !path.exists() {
            return Ok(None);
        }
        read_day_file(&path).map(Some)
    }

    fn save_entry(
        &mut self,
        date: DateKey,
        hour: Hour,
        content: &str,
    ) -> Result<Entry, StoreError> {
        let _lock = DayLock::acquire_default(&self.journal_dir, date)?;
        let path = self.day_path(date);
        let mut day = if path.exists() {
            read_day_file(&path)?
        } else {
            Day::new(date)
        };
        let entry = day.upsert(hour, content, Utc::now()).clone();
        write_day_file(&path, &day)?;
        Ok(entry)
    }

    fn delete_day(&mut self, date: DateKey) -> Result<(), StoreError> {
        let _lock = DayLock::acquire_default(&self.journal_dir, date)?;
        let path = self.day_path(date);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Write { path, source: e }),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Non-durable store. `fail_writes` makes every write return
/// `StoreError::Unavailable`, which is how tests exercise failure paths.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    days: BTreeMap<DateKey, Day>,
    pub fail_writes: bool,
    /// Every successful `save_entry` call, in order
    pub writes: Vec<(DateKey, Hour, String)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_days(days: impl IntoIterator<Item = Day>) -> Self {
        let mut store = Self::new();
        for day in days {
            store.days.insert(day.date, day);
        }
        store
    }
}

impl JournalStore for MemoryStore {
    fn load_all_days(&self) -> Result<Vec<Day>, StoreError> {
        Ok(self.days.values().rev().cloned().collect())
    }

    fn load_day(&self, date: DateKey) -> Result<Option<Day>, StoreError> {
        Ok(self.days.get(&date).cloned())
    }

    fn save_entry(
        &mut self,
        date: DateKey,
        hour: Hour,
        content: &str,
    ) -> Result<Entry, StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        let day = self.days.entry(date).or_insert_with(|| Day::new(date));
        let entry = day.upsert(hour, content, Utc::now()).clone();
        self.writes.push((date, hour, content.to_string()));
        Ok(entry)
    }

    fn delete_day(&mut self, date: DateKey) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        self.days.remove(&date);
        Ok(())
    }
}
