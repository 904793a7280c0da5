use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of hour slots in a day.
pub const HOURS_PER_DAY: u8 = 24;

/// Calendar date used as the identity of a `Day` (`YYYY-MM-DD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        DateKey(date)
    }

    /// Today's date in the local timezone.
    pub fn today() -> Self {
        DateKey(Local::now().date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    pub fn succ(&self) -> Self {
        DateKey(self.0.succ_opt().unwrap_or(self.0))
    }

    pub fn pred(&self) -> Self {
        DateKey(self.0.pred_opt().unwrap_or(self.0))
    }

    /// Long form used in lists, e.g. "Monday, March 3, 2025".
    pub fn display_long(&self) -> String {
        self.0.format("%A, %B %-d, %Y").to_string()
    }

    /// Parse a date argument: `YYYY-MM-DD` or the word `today`.
    pub fn parse_arg(s: &str) -> Result<Self, InvalidKey> {
        if s.eq_ignore_ascii_case("today") {
            return Ok(DateKey::today());
        }
        s.parse()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DateKey {
    type Err = InvalidKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(DateKey)
            .map_err(|_| InvalidKey::Date(s.to_string()))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Hour of day, always in `0..24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Hour(u8);

impl Hour {
    pub const MIDNIGHT: Hour = Hour(0);

    pub fn new(hour: u8) -> Result<Self, InvalidKey> {
        if hour < HOURS_PER_DAY {
            Ok(Hour(hour))
        } else {
            Err(InvalidKey::Hour(hour.to_string()))
        }
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// All 24 hours in order.
    pub fn all() -> impl Iterator<Item = Hour> {
        (0..HOURS_PER_DAY).map(Hour)
    }

    /// Slot label, e.g. "07:00".
    pub fn label(&self) -> String {
        format!("{:02}:00", self.0)
    }
}

impl TryFrom<u8> for Hour {
    type Error = InvalidKey;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Hour::new(value)
    }
}

impl From<Hour> for u8 {
    fn from(hour: Hour) -> u8 {
        hour.0
    }
}

impl FromStr for Hour {
    type Err = InvalidKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u8 = s
            .trim()
            .parse()
            .map_err(|_| InvalidKey::Hour(s.to_string()))?;
        Hour::new(n)
    }
}

impl fmt::Display for Hour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A malformed date or hour key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidKey {
    #[error("invalid date '{0}' (expected YYYY-MM-DD or 'today')")]
    Date(String),
    #[error("invalid hour '{0}' (expected 0-23)")]
    Hour(String),
}

/// One hour slot's text for a given date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub date: DateKey,
    pub hour: Hour,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(date: DateKey, hour: Hour, content: String, now: DateTime<Utc>) -> Self {
        Entry {
            id: format!("{}-{}", date, hour),
            date,
            hour,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// An entry with only whitespace counts as no entry for listing purposes.
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// All entries for one calendar date, ordered by hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: DateKey,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Day {
    pub fn new(date: DateKey) -> Self {
        Day {
            date,
            entries: Vec::new(),
        }
    }

    pub fn entry(&self, hour: Hour) -> Option<&Entry> {
        self.entries.iter().find(|e| e.hour == hour)
    }

    /// Content of an hour, empty when there is no record.
    pub fn content(&self, hour: Hour) -> &str {
        self.entry(hour).map_or("", |e| e.content.as_str())
    }

    /// True if at least one hour has non-blank text.
    pub fn has_content(&self) -> bool {
        self.entries.iter().any(|e| !e.is_blank())
    }

    /// Insert or update the entry for `hour`, keeping entries sorted by hour.
    /// `created_at` is preserved on update.
    pub fn upsert(&mut self, hour: Hour, content: &str, now: DateTime<Utc>) -> &Entry {
        let idx = match self.entries.binary_search_by_key(&hour, |e| e.hour) {
            Ok(idx) => {
                let entry = &mut self.entries[idx];
                entry.content = content.to_string();
                entry.updated_at = now;
                idx
            }
            Err(idx) => {
                self.entries
                    .insert(idx, Entry::new(self.date, hour, content.to_string(), now));
                idx
            }
        };
        &self.entries[idx]
    }

    /// Restore hour ordering after deserializing hand-edited files.
    pub fn normalize(&mut self) {
        self.entries.sort_by_key(|e| e.hour);
        self.entries.dedup_by_key(|e| e.hour);
    }
}
