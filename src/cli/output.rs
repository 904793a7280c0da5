use serde::Serialize;

use crate::io::recovery::RecoveryEntry;
use crate::model::Day;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct DaySummaryJson {
    pub date: String,
    pub label: String,
    pub notes: usize,
}

#[derive(Serialize)]
pub struct RecoveryJson {
    pub timestamp: String,
    pub category: String,
    pub description: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<(String, String)>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,
}

pub fn day_summary_json(day: &Day) -> DaySummaryJson {
    DaySummaryJson {
        date: day.date.to_string(),
        label: day.date.display_long(),
        notes: note_count(day),
    }
}

pub fn recovery_json(entry: &RecoveryEntry) -> RecoveryJson {
    RecoveryJson {
        timestamp: entry
            .timestamp
            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
        category: entry.category.to_string(),
        description: entry.description.clone(),
        fields: entry.fields.clone(),
        body: entry.body.clone(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

pub fn note_count(day: &Day) -> usize {
    day.entries.iter().filter(|e| !e.is_blank()).count()
}

/// One line per listed day: `2025-03-03  Monday, March 3, 2025  (2 notes)`
pub fn format_day_summary(day: &Day) -> String {
    let n = note_count(day);
    format!(
        "{}  {}  ({} note{})",
        day.date,
        day.date.display_long(),
        n,
        if n == 1 { "" } else { "s" }
    )
}

/// The day's heading followed by one `HH:00  text` line per note.
pub fn format_day(day: &Day) -> String {
    let mut out = day.date.display_long();
    for entry in day.entries.iter().filter(|e| !e.is_blank()) {
        let mut lines = entry.content.lines();
        let first = lines.next().unwrap_or("");
        out.push_str(&format!("\n{}  {}", entry.hour.label(), first));
        // Continuation lines line up under the text
        for line in lines {
            out.push_str(&format!("\n       {}", line));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DateKey, Hour};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn day() -> Day {
        let date: DateKey = "2025-03-03".parse().unwrap();
        let mut day = Day::new(date);
        day.upsert(Hour::new(9).unwrap(), "standup\nthen coffee", Utc::now());
        day.upsert(Hour::new(7).unwrap(), "woke up", Utc::now());
        day.upsert(Hour::new(8).unwrap(), "   ", Utc::now());
        day
    }

    #[test]
    fn summary_counts_only_written_hours() {
        assert_eq!(
            format_day_summary(&day()),
            "2025-03-03  Monday, March 3, 2025  (2 notes)"
        );
    }

    #[test]
    fn day_lists_notes_in_hour_order() {
        assert_eq!(
            format_day(&day()),
            "Monday, March 3, 2025\n07:00  woke up\n09:00  standup\n       then coffee"
        );
    }

    #[test]
    fn summary_json_shape() {
        let json = serde_json::to_value(day_summary_json(&day())).unwrap();
        assert_eq!(json["date"], "2025-03-03");
        assert_eq!(json["notes"], 2);
    }
}
