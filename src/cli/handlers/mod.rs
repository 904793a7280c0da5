mod init;
pub use init::cmd_init;

use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::recovery::{log_day_deletion, read_recovery_entries};
use crate::io::store::{FileStore, JournalStore};
use crate::model::{DateKey, Day, Hour};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let journal_dir = config_io::resolve_journal_dir(cli.journal_dir.as_deref())?;

    match cli.command {
        // No subcommand: launch the TUI
        None => {
            let config = config_io::read_config(&journal_dir)?;
            crate::tui::run(&journal_dir, config)
        }
        Some(cmd) => match cmd {
            Commands::Init(args) => cmd_init(&journal_dir, args),

            // Read commands
            Commands::Days => cmd_days(&journal_dir, json),
            Commands::Show(args) => cmd_show(&journal_dir, args, json),
            Commands::Recovery(args) => cmd_recovery(&journal_dir, args, json),

            // Write commands
            Commands::Write(args) => cmd_write(&journal_dir, args),
            Commands::Delete(args) => cmd_delete(&journal_dir, args),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_date(s: &str) -> Result<DateKey, String> {
    DateKey::parse_arg(s).map_err(|e| format!("{} (expected YYYY-MM-DD or \"today\")", e))
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_days(journal_dir: &Path, json: bool) -> CmdResult {
    let store = FileStore::open(journal_dir)?;
    let (days, skipped) = store.scan()?;
    for err in &skipped {
        eprintln!("warning: skipped {}", err);
    }
    let days: Vec<Day> = days.into_iter().filter(|d| d.has_content()).collect();

    if json {
        let out: Vec<DaySummaryJson> = days.iter().map(day_summary_json).collect();
        return print_json(&out);
    }
    if days.is_empty() {
        println!("no notes yet");
        return Ok(());
    }
    for day in &days {
        println!("{}", format_day_summary(day));
    }
    Ok(())
}

fn cmd_show(journal_dir: &Path, args: ShowArgs, json: bool) -> CmdResult {
    let date = parse_date(&args.date)?;
    let store = FileStore::open(journal_dir)?;
    let day = store.load_day(date)?;

    if json {
        return print_json(&day.unwrap_or_else(|| Day::new(date)));
    }
    match day.filter(|d| d.has_content()) {
        Some(day) => println!("{}", format_day(&day)),
        None => println!("no notes for {}", date.display_long()),
    }
    Ok(())
}

fn cmd_recovery(journal_dir: &Path, args: RecoveryArgs, json: bool) -> CmdResult {
    let entries = read_recovery_entries(journal_dir, args.limit);
    if json {
        let out: Vec<RecoveryJson> = entries.iter().map(recovery_json).collect();
        return print_json(&out);
    }
    if entries.is_empty() {
        println!("recovery log is empty");
        return Ok(());
    }
    for entry in &entries {
        print!("{}", entry.to_markdown());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_write(journal_dir: &Path, args: WriteArgs) -> CmdResult {
    let date = parse_date(&args.date)?;
    let hour: Hour = args.hour.parse()?;
    let mut store = FileStore::open(journal_dir)?;
    store.save_entry(date, hour, &args.text)?;
    println!("saved {} {}", date, hour.label());
    Ok(())
}

fn cmd_delete(journal_dir: &Path, args: DeleteArgs) -> CmdResult {
    let date = parse_date(&args.date)?;
    if !args.yes {
        return Err(format!("refusing to delete {} without --yes", date).into());
    }
    let mut store = FileStore::open(journal_dir)?;
    let Some(day) = store.load_day(date)? else {
        println!("no notes for {}", date.display_long());
        return Ok(());
    };
    log_day_deletion(journal_dir, &day);
    store.delete_day(date)?;
    println!("deleted {} (text kept in the recovery log)", date);
    Ok(())
}
