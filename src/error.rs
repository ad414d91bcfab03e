//! Error types shared by the snapshot engine and the configuration layer.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The error type for backup and configuration operations.
#[derive(Error, Debug)]
pub enum BackupError {
    /// Missing name/path, a name with path separators, or a source that does
    /// not exist when a game is added.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A targeted action referred to a game that is not in the registry.
    #[error("Game '{0}' not found in configuration.")]
    NotFound(String),

    /// The source path vanished between the existence check and the copy.
    #[error("Source path does not exist: {}", .0.display())]
    SourceMissing(PathBuf),

    /// Copying a source into a snapshot failed.
    #[error("Failed to copy into {}: {source}", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An old snapshot could not be removed.
    #[error("Failed to delete {}: {source}", path.display())]
    Delete {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration document exists but could not be read or parsed.
    #[error("Configuration at {} is unreadable or corrupted: {reason}", path.display())]
    ConfigCorrupt { path: PathBuf, reason: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BackupError {
    pub(crate) fn copy(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BackupError::Copy {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BackupError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BackupError>;

#[cfg(test)]
mod tests {
    use super::*;

    /// Tests that copy errors name the destination and the I/O cause.
    #[test]
    fn test_copy_error_display() {
        let err = BackupError::copy(
            "/backups/Foo_backup_2024-01-01_12-00-00",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let text = err.to_string();
        assert!(text.contains("Foo_backup_2024-01-01_12-00-00"));
        assert!(text.contains("denied"));
    }

    /// Tests the message surfaced for an unknown game.
    #[test]
    fn test_not_found_display() {
        let err = BackupError::NotFound("Foo".to_string());
        assert_eq!(err.to_string(), "Game 'Foo' not found in configuration.");
    }
}
