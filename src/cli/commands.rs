use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ilo", about = concat!("ilo v", env!("CARGO_PKG_VERSION"), " - an hour-by-hour journal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different journal directory
    #[arg(short = 'C', long = "journal-dir", global = true)]
    pub journal_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the journal directory and a default config.toml
    Init(InitArgs),
    /// List days that have notes, newest first
    Days,
    /// Show the notes of one day
    Show(ShowArgs),
    /// Set the note for one hour (empty text clears it)
    Write(WriteArgs),
    /// Delete every note of a day
    Delete(DeleteArgs),
    /// Show the recovery log, most recent first
    Recovery(RecoveryArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Date as YYYY-MM-DD, or "today"
    pub date: String,
}

#[derive(Args)]
pub struct WriteArgs {
    /// Date as YYYY-MM-DD, or "today"
    pub date: String,
    /// Hour of day, 0-23
    pub hour: String,
    /// Note text
    pub text: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Date as YYYY-MM-DD, or "today"
    pub date: String,
    /// Required: confirm the deletion
    #[arg(long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct RecoveryArgs {
    /// Show only the N most recent entries
    #[arg(long)]
    pub limit: Option<usize>,
}
