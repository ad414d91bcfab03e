use super::data::Snapshot;
use super::resolve::{classify, EntryKind};
use crate::error::{BackupError, Result};
use crate::filename_utils::check_game_name;
use chrono::NaiveDateTime;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Ensures the parent directory of `path` exists.
fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| BackupError::copy(parent, e))?;
        }
    }
    Ok(())
}

/// Fails when the destination is already occupied.
fn ensure_vacant(destination: &Path) -> Result<()> {
    if fs::symlink_metadata(destination).is_ok() {
        return Err(BackupError::copy(
            destination,
            io::Error::new(
                io::ErrorKind::AlreadyExists,
                "snapshot destination already exists",
            ),
        ));
    }
    Ok(())
}

/// Recursively copies `src` into the new directory `dest`, preserving structure.
///
/// `dest` is created with `create_dir`, so an existing destination fails.
fn copy_dir_recursive(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir(dest).map_err(|e| BackupError::copy(dest, e))?;

    for entry in WalkDir::new(src).min_depth(1).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(src).to_path_buf();
            BackupError::copy(path, io::Error::other(e))
        })?;
        let rel_path = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| BackupError::copy(entry.path(), io::Error::other(e)))?;
        let new_path = dest.join(rel_path);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&new_path).map_err(|e| BackupError::copy(&new_path, e))?;
        } else {
            fs::copy(entry.path(), &new_path).map_err(|e| BackupError::copy(&new_path, e))?;
        }
    }

    Ok(())
}

/// Copies a single file to the exact destination path.
fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    fs::copy(src, dest).map_err(|e| BackupError::copy(dest, e))?;
    Ok(())
}

/// Creates a new snapshot of `source` for a game.
///
/// The destination is `backup_root/{game}_backup_{timestamp}`. Directory
/// sources are cloned recursively; a file source is copied to the
/// destination path itself. The destination must not exist yet, which
/// makes a second call for the same game within one second fail. A
/// partially copied destination is left behind on error. Game names with
/// path separators are rejected before anything is touched.
///
/// # Arguments
///
/// * `backup_root` - Directory holding all snapshots. Created if missing.
/// * `game_name` - The registry key of the game.
/// * `source` - The configured save file or directory.
/// * `instant` - Local wall-clock time used for the name.
pub fn create_snapshot(
    backup_root: &Path,
    game_name: &str,
    source: &Path,
    instant: NaiveDateTime,
) -> Result<Snapshot> {
    check_game_name(game_name)?;
    let snapshot = Snapshot::planned(backup_root, game_name, instant);
    let destination = &snapshot.path;

    match classify(source) {
        EntryKind::Missing => return Err(BackupError::SourceMissing(source.to_path_buf())),
        EntryKind::Directory => {
            ensure_parent(destination)?;
            ensure_vacant(destination)?;
            copy_dir_recursive(source, destination)?;
        }
        EntryKind::File => {
            ensure_parent(destination)?;
            ensure_vacant(destination)?;
            copy_file(source, destination)?;
        }
    }

    log::info!(
        "Snapshot created for '{}' at {:?}",
        game_name,
        destination
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn instant() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn write_file(path: &Path, content: &str) {
        let mut f = File::create(path).unwrap();
        write!(f, "{}", content).unwrap();
    }

    /// Tests that a directory tree is cloned with its structure intact.
    #[test]
    fn test_create_snapshot_from_directory() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("saves");
        fs::create_dir_all(source.join("profiles").join("p1")).unwrap();
        write_file(&source.join("slot0.sav"), "zero");
        write_file(&source.join("profiles").join("p1").join("slot1.sav"), "one");
        fs::create_dir(source.join("empty")).unwrap();

        let root = dir.path().join("backups");
        let snapshot = create_snapshot(&root, "Foo", &source, instant()).unwrap();

        assert_eq!(snapshot.path, root.join("Foo_backup_2024-01-01_12-00-00"));
        assert_eq!(
            fs::read_to_string(snapshot.path.join("slot0.sav")).unwrap(),
            "zero"
        );
        assert_eq!(
            fs::read_to_string(snapshot.path.join("profiles").join("p1").join("slot1.sav"))
                .unwrap(),
            "one"
        );
        assert!(snapshot.path.join("empty").is_dir());
    }

    /// Tests that a single file is copied to the destination path itself.
    #[test]
    fn test_create_snapshot_from_file() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("game.sav");
        write_file(&source, "state");

        let root = dir.path().join("nested").join("backups");
        let snapshot = create_snapshot(&root, "Foo", &source, instant()).unwrap();

        assert!(snapshot.path.is_file());
        assert_eq!(fs::read_to_string(&snapshot.path).unwrap(), "state");
    }

    /// Tests that an existing destination makes the copy fail.
    #[test]
    fn test_create_snapshot_same_second_fails() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("saves");
        fs::create_dir(&source).unwrap();
        write_file(&source.join("a.sav"), "a");
        let root = dir.path().join("backups");

        create_snapshot(&root, "Foo", &source, instant()).unwrap();
        let err = create_snapshot(&root, "Foo", &source, instant()).unwrap_err();
        match err {
            BackupError::Copy { source, .. } => {
                assert_eq!(source.kind(), io::ErrorKind::AlreadyExists)
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let file_source = dir.path().join("single.sav");
        write_file(&file_source, "x");
        create_snapshot(&root, "Bar", &file_source, instant()).unwrap();
        assert!(create_snapshot(&root, "Bar", &file_source, instant()).is_err());
    }

    /// Tests that a vanished source is reported as missing and nothing is created.
    #[test]
    fn test_create_snapshot_missing_source() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("backups");
        let gone = dir.path().join("gone");
        let err = create_snapshot(&root, "Foo", &gone, instant()).unwrap_err();
        assert!(matches!(err, BackupError::SourceMissing(ref path) if *path == gone));
        assert!(!root.exists());
    }

    /// Tests that a nested game name is rejected before the root is created.
    #[test]
    fn test_create_snapshot_rejects_nested_name() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("game.sav");
        write_file(&source, "state");
        let root = dir.path().join("backups");

        let err = create_snapshot(&root, "Studio/Game", &source, instant()).unwrap_err();
        assert!(matches!(err, BackupError::Validation(_)));
        assert!(!root.exists());
    }
}
