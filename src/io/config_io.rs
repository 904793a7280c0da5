use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::JournalConfig;

/// Environment variable that overrides the default journal location.
pub const JOURNAL_DIR_ENV: &str = "ILO_JOURNAL_DIR";

/// Template written by `ilo init`. Every key is optional.
const DEFAULT_CONFIG: &str = "\
# ilo journal settings. Remove a line to fall back to its default.

[swipe]
# Width of the delete action revealed by a left swipe (px)
reveal_width = 80.0
# Release past this distance to leave the row open (px)
open_threshold = 40.0
# Release speed treated as a flick (px/ms)
velocity_threshold = 0.4
# Movement ignored before deciding between swipe and scroll (px)
dead_zone = 10.0
# Pull past reveal_width * commit_ratio to ask for deletion directly
commit_ratio = 1.2
commit_velocity = 0.8
rubber_band = 0.3
settle_ms = 350

[autosave]
debounce_ms = 500

[ui]
# Pixels per terminal column for mouse gestures
cell_width_px = 8.0
";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no journal directory: pass --journal-dir or set ILO_JOURNAL_DIR")]
    NoJournalDir,
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse config.toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pick the journal directory: explicit flag, then the environment, then
/// the platform data directory.
pub fn resolve_journal_dir(explicit: Option<&str>) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = explicit {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(dir) = std::env::var(JOURNAL_DIR_ENV)
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }
    dirs::data_dir()
        .map(|d| d.join("ilo"))
        .ok_or(ConfigError::NoJournalDir)
}

pub fn config_path(journal_dir: &Path) -> PathBuf {
    journal_dir.join("config.toml")
}

/// Read config.toml. A missing file yields the defaults.
pub fn read_config(journal_dir: &Path) -> Result<JournalConfig, ConfigError> {
    let path = config_path(journal_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(JournalConfig::default()),
        Err(e) => return Err(ConfigError::Read { path, source: e }),
    };
    Ok(toml::from_str(&text)?)
}

/// Create the journal directory and a commented config.toml.
/// Returns false if a config already existed and `force` was not set.
pub fn write_default_config(journal_dir: &Path, force: bool) -> Result<bool, ConfigError> {
    fs::create_dir_all(journal_dir.join("days"))?;
    let path = config_path(journal_dir);
    if path.exists() && !force {
        return Ok(false);
    }
    fs::write(&path, DEFAULT_CONFIG)?;
    Ok(true)
}
