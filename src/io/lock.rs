use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::model::DateKey;

/// Directory under the journal root holding one lock file per day.
pub const LOCK_DIR: &str = ".locks";

const RETRY_EVERY: Duration = Duration::from_millis(10);

/// Exclusive hold on one day's file for a read-modify-write.
///
/// The TUI and the CLI may write the journal at the same time; two writers
/// of the same day would otherwise lose one hour's text. Writers of
/// different days never wait on each other.
///
/// Lock files stay in place after release; removing one while another
/// process waits on it would break exclusion.
#[derive(Debug)]
pub struct DayLock {
    _file: File,
    date: DateKey,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{date} is being written by another ilo process")]
    Busy { date: DateKey },
}

pub fn lock_path(journal_dir: &Path, date: DateKey) -> PathBuf {
    journal_dir.join(LOCK_DIR).join(format!("{}.lock", date))
}

impl DayLock {
    /// Wait up to `timeout` for the lock on `date`.
    pub fn acquire(journal_dir: &Path, date: DateKey, timeout: Duration) -> Result<Self, LockError> {
        let path = lock_path(journal_dir, date);
        let file = open_lock_file(&path)?;

        let start = Instant::now();
        loop {
            if try_lock(&file).is_ok() {
                return Ok(DayLock { _file: file, date });
            }
            if start.elapsed() >= timeout {
                return Err(LockError::Busy { date });
            }
            std::thread::sleep(RETRY_EVERY);
        }
    }

    /// A single save is a few milliseconds; two seconds means a stuck writer.
    pub fn acquire_default(journal_dir: &Path, date: DateKey) -> Result<Self, LockError> {
        Self::acquire(journal_dir, date, Duration::from_secs(2))
    }

    pub fn date(&self) -> DateKey {
        self.date
    }
}

fn open_lock_file(path: &Path) -> Result<File, LockError> {
    let create_err = |source| LockError::Create {
        path: path.to_path_buf(),
        source,
    };
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(create_err)?;
    }
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(path)
        .map_err(create_err)
}

// flock is released when the handle closes
#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}
