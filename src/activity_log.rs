// Save Backup Utility by andromarces

use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default activity log file, relative to the working directory.
pub const DEFAULT_LOG_FILE: &str = "backup_log.txt";

const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Sink for user-facing activity lines.
///
/// Implementations never fail: write errors are reported through `log`
/// and otherwise dropped.
pub trait ActivityLog {
    fn record(&self, message: &str);
}

impl<T: ActivityLog + ?Sized> ActivityLog for &T {
    fn record(&self, message: &str) {
        (**self).record(message)
    }
}

/// Formats a message the way it is stored in the activity log.
pub fn format_line(message: &str) -> String {
    format!("[{}] {}", Local::now().format(LOG_TIMESTAMP_FORMAT), message)
}

/// Append-only activity log backed by a text file.
#[derive(Debug, Clone)]
pub struct FileActivityLog {
    path: PathBuf,
}

impl FileActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }

    /// Returns the full log contents, or an empty string if no log exists yet.
    pub fn read_all(&self) -> io::Result<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e),
        }
    }
}

impl Default for FileActivityLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_FILE)
    }
}

impl ActivityLog for FileActivityLog {
    fn record(&self, message: &str) {
        log::info!("{}", message);
        let line = format_line(message);
        if let Err(e) = self.append(&line) {
            log::error!("Error writing to log file {:?}: {}", self.path, e);
        }
    }
}
