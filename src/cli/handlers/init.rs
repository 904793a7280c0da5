use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io;

pub fn cmd_init(journal_dir: &Path, args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let written = config_io::write_default_config(journal_dir, args.force)?;
    let config = config_io::config_path(journal_dir);
    if written {
        println!("initialized journal in {}", journal_dir.display());
        println!("  config: {}", config.display());
    } else {
        println!(
            "journal already initialized: {} exists (use --force to overwrite)",
            config.display()
        );
    }
    Ok(())
}
