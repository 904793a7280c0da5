use std::fmt;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::model::{DateKey, Day, Hour};

/// Written once at the top of a new recovery log.
const FILE_HEADER: &str = "\
<!-- ilo recovery log: text that could not be saved normally, and days
     removed with delete. View with: ilo recovery
     Safe to delete once you have what you need. -->

---
";

/// What kind of failure produced a recovery entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryCategory {
    /// A save that failed after its editor was gone
    Save,
    /// A day removed by the user
    Delete,
}

impl fmt::Display for RecoveryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryCategory::Save => write!(f, "save"),
            RecoveryCategory::Delete => write!(f, "delete"),
        }
    }
}

impl RecoveryCategory {
    pub fn parse_category(s: &str) -> Option<Self> {
        match s {
            "save" => Some(RecoveryCategory::Save),
            "delete" => Some(RecoveryCategory::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecoveryEntry {
    pub timestamp: DateTime<Utc>,
    pub category: RecoveryCategory,
    pub description: String,
    pub fields: Vec<(String, String)>,
    pub body: String,
}

pub fn recovery_log_path(journal_dir: &Path) -> PathBuf {
    journal_dir.join(".recovery.log")
}

impl RecoveryEntry {
    /// Markdown block as stored in the log.
    pub fn to_markdown(&self) -> String {
        let mut out = format!(
            "## {} | {}: {}\n\n",
            self.timestamp
                .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            self.category,
            self.description,
        );
        for (key, value) in &self.fields {
            out.push_str(&format!("{}: {}\n", key, value));
        }
        if !self.body.is_empty() {
            out.push_str("\n```text\n");
            out.push_str(&self.body);
            if !self.body.ends_with('\n') {
                out.push('\n');
            }
            out.push_str("```\n");
        }
        out.push_str("\n---\n");
        out
    }
}

/// Append an entry. Never fails the caller: a log that cannot be written
/// is reported on stderr.
pub fn log_recovery(journal_dir: &Path, entry: RecoveryEntry) {
    if let Err(e) = append_entry(journal_dir, &entry) {
        eprintln!("warning: could not write to recovery log: {}", e);
    }
}

fn append_entry(journal_dir: &Path, entry: &RecoveryEntry) -> io::Result<()> {
    let path = recovery_log_path(journal_dir);
    let needs_header = std::fs::metadata(&path).map_or(true, |m| m.len() == 0);
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if needs_header {
        file.write_all(FILE_HEADER.as_bytes())?;
    }
    file.write_all(entry.to_markdown().as_bytes())
}

/// Record text whose final save failed after the slot was torn down.
pub fn log_unsaved_edit(
    journal_dir: &Path,
    date: DateKey,
    hour: Hour,
    content: &str,
    error: &str,
) {
    log_recovery(
        journal_dir,
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Save,
            description: format!("unsaved edit for {} {}", date, hour.label()),
            fields: vec![
                ("Date".to_string(), date.to_string()),
                ("Hour".to_string(), hour.to_string()),
                ("Error".to_string(), error.to_string()),
            ],
            body: content.to_string(),
        },
    );
}

/// Record the text of a day before it is deleted.
pub fn log_day_deletion(journal_dir: &Path, day: &Day) {
    let body = day
        .entries
        .iter()
        .filter(|e| !e.is_blank())
        .map(|e| format!("[{}] {}", e.hour.label(), e.content))
        .collect::<Vec<_>>()
        .join("\n");
    log_recovery(
        journal_dir,
        RecoveryEntry {
            timestamp: Utc::now(),
            category: RecoveryCategory::Delete,
            description: format!("day {} deleted", day.date),
            fields: vec![("Date".to_string(), day.date.to_string())],
            body,
        },
    );
}

/// Entries from the log, most recent first.
pub fn read_recovery_entries(journal_dir: &Path, limit: Option<usize>) -> Vec<RecoveryEntry> {
    let content = match std::fs::read_to_string(recovery_log_path(journal_dir)) {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };
    let mut entries = parse_entries(&content);
    if let Some(n) = limit {
        let skip = entries.len().saturating_sub(n);
        entries.drain(..skip);
    }
    entries.reverse();
    entries
}

fn parse_entries(content: &str) -> Vec<RecoveryEntry> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some((timestamp, category, description)) =
            line.strip_prefix("## ").and_then(parse_header)
        else {
            continue;
        };

        let mut fields = Vec::new();
        let mut body_lines: Vec<&str> = Vec::new();
        let mut in_body = false;
        for line in lines.by_ref() {
            if in_body {
                if line == "```" {
                    in_body = false;
                } else {
                    body_lines.push(line);
                }
                continue;
            }
            if line == "---" {
                break;
            }
            if line.starts_with("```") {
                in_body = true;
                continue;
            }
            if let Some((key, value)) = line.trim().split_once(": ") {
                fields.push((key.to_string(), value.to_string()));
            }
        }

        entries.push(RecoveryEntry {
            timestamp,
            category,
            description,
            fields,
            body: body_lines.join("\n"),
        });
    }
    entries
}

/// `<rfc3339> | <category>: <description>`
fn parse_header(header: &str) -> Option<(DateTime<Utc>, RecoveryCategory, String)> {
    let (stamp, rest) = header.split_once(" | ")?;
    let timestamp = DateTime::parse_from_rfc3339(stamp).ok()?.with_timezone(&Utc);
    let (category, description) = rest.split_once(": ")?;
    let category = RecoveryCategory::parse_category(category)?;
    Some((timestamp, category, description.to_string()))
}
