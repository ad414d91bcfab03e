use super::data::Snapshot;
use crate::error::{BackupError, Result};
use crate::filename_utils;
use std::fs;
use std::io;
use std::path::Path;

/// Lists every snapshot of a game directly under the backup root.
///
/// Any entry (file or directory) whose name starts with `{game}_backup_`
/// belongs to the game; everything else is ignored. A missing backup root
/// yields an empty list. Results are sorted by name, oldest first for
/// well-formed timestamps.
pub fn list_snapshots(backup_root: &Path, game_name: &str) -> Result<Vec<Snapshot>> {
    let entries = match fs::read_dir(backup_root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(BackupError::io(backup_root, e)),
    };

    let mut snapshots = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| BackupError::io(backup_root, e))?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        if let Some(suffix) = filename_utils::strip_snapshot_prefix(&file_name, game_name) {
            snapshots.push(Snapshot {
                game_name: game_name.to_string(),
                timestamp: suffix.to_string(),
                path: entry.path(),
            });
        }
    }

    snapshots.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(snapshots)
}
