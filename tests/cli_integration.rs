//! Integration tests for the `ilo` CLI.
//!
//! Each test creates a temp journal directory, runs `ilo -C <dir>` as a
//! subprocess, and verifies stdout and/or file contents.

use std::fs;
use std::path::Path;
use std::process::Command;

/// Run `ilo` against the given journal, returning (stdout, stderr, success).
fn run_ilo(journal: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_ilo"))
        .arg("-C")
        .arg(journal)
        .args(args)
        .env_remove("ILO_JOURNAL_DIR")
        .output()
        .expect("failed to run ilo");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `ilo` expecting success, return stdout.
fn run_ilo_ok(journal: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_ilo(journal, args);
    if !success {
        panic!(
            "ilo {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// A day file as another device would write it.
fn write_day_file(journal: &Path, date: &str, entries: &[(u8, &str)]) {
    let entries: Vec<serde_json::Value> = entries
        .iter()
        .map(|(hour, content)| {
            serde_json::json!({
                "id": format!("{}-{}", date, hour),
                "date": date,
                "hour": hour,
                "content": content,
                "createdAt": "2025-03-03T08:00:00Z",
                "updatedAt": "2025-03-03T08:00:00Z",
            })
        })
        .collect();
    let day = serde_json::json!({ "date": date, "entries": entries });
    fs::create_dir_all(journal.join("days")).unwrap();
    fs::write(
        journal.join("days").join(format!("{}.json", date)),
        serde_json::to_string_pretty(&day).unwrap(),
    )
    .unwrap();
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

#[test]
fn test_init_creates_config_once() {
    let tmp = tempfile::TempDir::new().unwrap();
    let journal = tmp.path().join("journal");

    let out = run_ilo_ok(&journal, &["init"]);
    assert!(out.contains("initialized journal"));
    assert!(journal.join("config.toml").exists());
    assert!(journal.join("days").is_dir());

    fs::write(journal.join("config.toml"), "[autosave]\ndebounce_ms = 900\n").unwrap();
    let out = run_ilo_ok(&journal, &["init"]);
    assert!(out.contains("already initialized"));
    let config = fs::read_to_string(journal.join("config.toml")).unwrap();
    assert!(config.contains("900"));

    run_ilo_ok(&journal, &["init", "--force"]);
    let config = fs::read_to_string(journal.join("config.toml")).unwrap();
    assert!(!config.contains("900"));
}

// ---------------------------------------------------------------------------
// write / show / days
// ---------------------------------------------------------------------------

#[test]
fn test_write_then_show() {
    let tmp = tempfile::TempDir::new().unwrap();

    let out = run_ilo_ok(tmp.path(), &["write", "2025-03-03", "9", "standup"]);
    assert!(out.contains("saved 2025-03-03 09:00"));
    run_ilo_ok(tmp.path(), &["write", "2025-03-03", "7", "coffee"]);

    let out = run_ilo_ok(tmp.path(), &["show", "2025-03-03"]);
    assert_eq!(
        out,
        "Monday, March 3, 2025\n07:00  coffee\n09:00  standup\n"
    );
}

#[test]
fn test_write_overwrites_hour_and_keeps_created_at() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_day_file(tmp.path(), "2025-03-03", &[(9, "draft")]);

    run_ilo_ok(tmp.path(), &["write", "2025-03-03", "9", "final"]);

    let out = run_ilo_ok(tmp.path(), &["show", "2025-03-03", "--json"]);
    let day: serde_json::Value = serde_json::from_str(&out).unwrap();
    let entries = day["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["content"], "final");
    assert_eq!(entries[0]["id"], "2025-03-03-9");
    assert_eq!(entries[0]["createdAt"], "2025-03-03T08:00:00Z");
    assert_ne!(entries[0]["updatedAt"], "2025-03-03T08:00:00Z");
}

#[test]
fn test_write_rejects_bad_keys() {
    let tmp = tempfile::TempDir::new().unwrap();

    let (_, stderr, success) = run_ilo(tmp.path(), &["write", "2025-03-03", "24", "late"]);
    assert!(!success);
    assert!(stderr.starts_with("error:"));

    let (_, stderr, success) = run_ilo(tmp.path(), &["write", "March 3", "9", "x"]);
    assert!(!success);
    assert!(stderr.contains("YYYY-MM-DD"));
}

#[test]
fn test_show_missing_day() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_ilo_ok(tmp.path(), &["show", "2025-03-03"]);
    assert!(out.contains("no notes for Monday, March 3, 2025"));

    let out = run_ilo_ok(tmp.path(), &["show", "2025-03-03", "--json"]);
    let day: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(day["date"], "2025-03-03");
    assert_eq!(day["entries"].as_array().unwrap().len(), 0);
}

#[test]
fn test_days_lists_newest_first_and_skips_blank_days() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_day_file(tmp.path(), "2025-03-01", &[(8, "first")]);
    write_day_file(tmp.path(), "2025-03-03", &[(9, "standup"), (10, "review")]);
    write_day_file(tmp.path(), "2025-03-02", &[(9, "   ")]);

    let out = run_ilo_ok(tmp.path(), &["days"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "2025-03-03  Monday, March 3, 2025  (2 notes)",
            "2025-03-01  Saturday, March 1, 2025  (1 note)",
        ]
    );

    let out = run_ilo_ok(tmp.path(), &["days", "--json"]);
    let days: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(days.as_array().unwrap().len(), 2);
    assert_eq!(days[0]["date"], "2025-03-03");
    assert_eq!(days[0]["notes"], 2);
}

#[test]
fn test_days_warns_about_unreadable_files() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_day_file(tmp.path(), "2025-03-03", &[(9, "ok")]);
    fs::write(tmp.path().join("days/2025-03-04.json"), "{ not json").unwrap();

    let (stdout, stderr, success) = run_ilo(tmp.path(), &["days"]);
    assert!(success);
    assert!(stdout.contains("2025-03-03"));
    assert!(stderr.contains("warning:"));
    assert!(stderr.contains("2025-03-04.json"));
}

#[test]
fn test_days_empty_journal() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_ilo_ok(tmp.path(), &["days"]);
    assert_eq!(out, "no notes yet\n");
}

// ---------------------------------------------------------------------------
// delete / recovery
// ---------------------------------------------------------------------------

#[test]
fn test_delete_requires_yes() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_day_file(tmp.path(), "2025-03-03", &[(9, "keep me")]);

    let (_, stderr, success) = run_ilo(tmp.path(), &["delete", "2025-03-03"]);
    assert!(!success);
    assert!(stderr.contains("--yes"));
    assert!(tmp.path().join("days/2025-03-03.json").exists());
}

#[test]
fn test_delete_removes_day_and_logs_text() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_day_file(tmp.path(), "2025-03-03", &[(9, "standup"), (14, "walk")]);

    let out = run_ilo_ok(tmp.path(), &["delete", "2025-03-03", "--yes"]);
    assert!(out.contains("deleted 2025-03-03"));
    assert!(!tmp.path().join("days/2025-03-03.json").exists());

    let out = run_ilo_ok(tmp.path(), &["recovery"]);
    assert!(out.contains("delete: day 2025-03-03 deleted"));
    assert!(out.contains("[09:00] standup"));
    assert!(out.contains("[14:00] walk"));

    // Deleting again is not an error
    let out = run_ilo_ok(tmp.path(), &["delete", "2025-03-03", "--yes"]);
    assert!(out.contains("no notes for"));
}

#[test]
fn test_recovery_limit_and_json() {
    let tmp = tempfile::TempDir::new().unwrap();
    write_day_file(tmp.path(), "2025-03-01", &[(9, "one")]);
    write_day_file(tmp.path(), "2025-03-02", &[(9, "two")]);
    run_ilo_ok(tmp.path(), &["delete", "2025-03-01", "--yes"]);
    run_ilo_ok(tmp.path(), &["delete", "2025-03-02", "--yes"]);

    let out = run_ilo_ok(tmp.path(), &["recovery", "--limit", "1", "--json"]);
    let entries: serde_json::Value = serde_json::from_str(&out).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["category"], "delete");
    assert_eq!(entries[0]["body"], "[09:00] two");
}

#[test]
fn test_recovery_empty() {
    let tmp = tempfile::TempDir::new().unwrap();
    let out = run_ilo_ok(tmp.path(), &["recovery"]);
    assert_eq!(out, "recovery log is empty\n");
}
