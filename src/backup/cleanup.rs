use super::data::{DeleteReport, Snapshot};
use crate::error::BackupError;
use std::fs;

/// Deletes a single snapshot, recursively when it is a directory.
pub fn delete_snapshot(snapshot: &Snapshot) -> Result<(), BackupError> {
    let path = &snapshot.path;
    // symlink_metadata so a snapshot that is itself a link is unlinked, not followed.
    let result = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(e) => Err(e),
    };

    result.map_err(|source| BackupError::Delete {
        path: path.clone(),
        source,
    })?;
    log::info!("Deleted snapshot: {:?}", path);
    Ok(())
}

/// Removes old snapshots on behalf of the engine.
pub trait SnapshotRemover {
    fn remove(&self, snapshot: &Snapshot) -> Result<(), BackupError>;
}

impl<T: SnapshotRemover + ?Sized> SnapshotRemover for &T {
    fn remove(&self, snapshot: &Snapshot) -> Result<(), BackupError> {
        (**self).remove(snapshot)
    }
}

/// Deletes snapshots from the filesystem with [`delete_snapshot`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FsRemover;

impl SnapshotRemover for FsRemover {
    fn remove(&self, snapshot: &Snapshot) -> Result<(), BackupError> {
        delete_snapshot(snapshot)
    }
}

/// Deletes each snapshot independently.
///
/// A failure is recorded in the report and the remaining snapshots are
/// still attempted.
pub fn delete_snapshots(snapshots: &[Snapshot]) -> DeleteReport {
    delete_snapshots_with(&FsRemover, snapshots)
}

/// Like [`delete_snapshots`], going through the given remover.
pub fn delete_snapshots_with<R: SnapshotRemover>(
    remover: &R,
    snapshots: &[Snapshot],
) -> DeleteReport {
    let mut report = DeleteReport::default();
    for snapshot in snapshots {
        match remover.remove(snapshot) {
            Ok(()) => report.deleted.push(snapshot.path.clone()),
            Err(e) => {
                log::error!("Failed to delete snapshot {:?}: {}", snapshot.path, e);
                report.failures.push(e);
            }
        }
    }
    report
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{delete_snapshot, SnapshotRemover};
    use crate::backup::data::Snapshot;
    use crate::error::BackupError;
    use std::io;
    use std::path::PathBuf;

    /// Refuses to delete one path and deletes everything else for real.
    pub(crate) struct LockedRemover {
        pub(crate) locked: PathBuf,
    }

    impl SnapshotRemover for LockedRemover {
        fn remove(&self, snapshot: &Snapshot) -> Result<(), BackupError> {
            if snapshot.path == self.locked {
                return Err(BackupError::Delete {
                    path: snapshot.path.clone(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "locked"),
                });
            }
            delete_snapshot(snapshot)
        }
    }
}
