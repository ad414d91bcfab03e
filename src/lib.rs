pub mod activity_log;
pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod filename_utils;
pub mod logging;
pub mod manager;
pub mod registry;

use clap::Parser;
use std::process::ExitCode;

pub use activity_log::{ActivityLog, FileActivityLog};
pub use config::{AppConfig, ConfigStore, JsonConfigStore};
pub use error::BackupError;
pub use manager::SaveManager;
pub use registry::{GameEntry, Registry};

/// Runs the command-line entry point.
pub fn run() -> ExitCode {
    let cli = cli::Cli::parse();
    logging::init_logging(cli.verbose);
    cli::execute(cli)
}
