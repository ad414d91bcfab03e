// Save Backup Utility by andromarces

use crate::activity_log::{FileActivityLog, DEFAULT_LOG_FILE};
use crate::backup::{BatchResult, ItemOutcome, RetentionPolicy, SystemClock};
use crate::config::{JsonConfigStore, DEFAULT_CONFIG_FILE};
use crate::error::Result;
use crate::manager::SaveManager;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Back up game save files and folders into timestamped snapshots.
#[derive(Parser, Debug)]
#[command(name = "game-save-backup", version, about)]
pub struct Cli {
    /// Configuration document holding the games and the backup directory
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Activity log file
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Print debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Show the backup directory and the configured games
    List,
    /// Add a game, or change the save path of an existing one
    Add {
        /// Game name
        name: String,
        /// Save file or directory to back up
        path: String,
    },
    /// Remove a game from the configuration (its backups are kept)
    Remove {
        /// Game name
        name: String,
    },
    /// Set the directory that receives backups
    SetRoot {
        /// Backup directory, created on first backup
        path: String,
    },
    /// Back up all games
    Backup {
        /// Keep old backups instead of replacing them
        #[arg(long)]
        keep_old: bool,
    },
    /// Replace the backups of a single game
    Replace {
        /// Game name
        name: String,
        /// Delete existing backups without asking
        #[arg(short, long)]
        yes: bool,
    },
    /// List the backups of a game
    Snapshots {
        /// Game name
        name: String,
    },
    /// Print the activity log
    Log,
}

type Manager = SaveManager<JsonConfigStore, FileActivityLog, SystemClock>;

/// Executes a parsed command line.
pub fn execute(cli: Cli) -> ExitCode {
    let activity = FileActivityLog::new(&cli.log_file);
    let mut manager = SaveManager::open(
        JsonConfigStore::new(&cli.config),
        activity.clone(),
        SystemClock,
    );

    match dispatch(&mut manager, &activity, cli.command) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(
    manager: &mut Manager,
    activity: &FileActivityLog,
    command: Command,
) -> Result<ExitCode> {
    match command {
        Command::List => {
            println!("Backup directory: {}", manager.config().backup_dir);
            if manager.games().is_empty() {
                println!("No games are configured.");
            }
            for (name, path) in manager.games().iter() {
                println!("  {}  ->  {}", name, path);
            }
        }
        Command::Add { name, path } => {
            let entry = manager.add_game(&name, &path)?;
            println!("Added game: {}", entry.name);
        }
        Command::Remove { name } => {
            manager.remove_game(&name)?;
            println!("Removed game: {}", name);
        }
        Command::SetRoot { path } => {
            manager.set_backup_dir(&path)?;
            println!("Backup directory set to: {}", manager.config().backup_dir);
        }
        Command::Backup { keep_old } => {
            let policy = if keep_old {
                RetentionPolicy::Preserve
            } else {
                RetentionPolicy::Replace
            };
            let result = manager.backup_all(policy);
            return Ok(report_batch(&result));
        }
        Command::Replace { name, yes } => {
            let existing = manager.snapshots(&name)?;
            if !existing.is_empty() && !yes {
                println!(
                    "This will delete {} existing backup(s) for '{}'. \
                     Re-run with --yes to continue.",
                    existing.len(),
                    name
                );
                return Ok(ExitCode::FAILURE);
            }
            let outcome = manager.replace_backup(&name)?;
            println!("{}: {}", name, outcome);
            if !outcome.is_success() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Snapshots { name } => {
            let snapshots = manager.snapshots(&name)?;
            if snapshots.is_empty() {
                println!("No backups for '{}'.", name);
            }
            for snapshot in snapshots {
                println!("  {}", snapshot.path.display());
            }
        }
        Command::Log => {
            let content = activity
                .read_all()
                .map_err(|e| crate::error::BackupError::io(activity.path(), e))?;
            print!("{}", content);
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints the per-game report and the summary line.
fn report_batch(result: &BatchResult) -> ExitCode {
    if result.attempted == 0 {
        println!("No games are configured for backup.");
        return ExitCode::SUCCESS;
    }
    for item in &result.items {
        println!("  {}: {}", item.game, item.outcome);
    }
    if !result.delete_failures.is_empty() {
        println!(
            "  {} old backup(s) could not be deleted.",
            result.delete_failures.len()
        );
    }
    println!("{}", result.summary());

    let any_failed = result
        .items
        .iter()
        .any(|item| matches!(item.outcome, ItemOutcome::Failed { .. }));
    if any_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
