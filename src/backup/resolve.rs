use std::fs;
use std::path::Path;

/// What a path points at on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Missing,
    File,
    Directory,
}

impl EntryKind {
    pub fn exists(self) -> bool {
        self != EntryKind::Missing
    }
}

/// Classifies a path without touching it.
///
/// Symlinks are followed, so a dangling link reports `Missing`. Metadata
/// errors are folded into `Missing` rather than surfaced.
pub fn classify(path: &Path) -> EntryKind {
    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => EntryKind::Directory,
        Ok(_) => EntryKind::File,
        Err(e) => {
            log::debug!("Treating {:?} as missing: {}", path, e);
            EntryKind::Missing
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    /// Tests classification of files, directories and absent paths.
    #[test]
    fn test_classify() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("save.dat");
        File::create(&file).unwrap();

        assert_eq!(classify(dir.path()), EntryKind::Directory);
        assert_eq!(classify(&file), EntryKind::File);
        assert_eq!(classify(&dir.path().join("nope")), EntryKind::Missing);
        assert!(!classify(&dir.path().join("nope")).exists());
    }

    /// Tests that a dangling symlink counts as missing.
    #[cfg(unix)]
    #[test]
    fn test_classify_dangling_symlink() {
        let dir = tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path().join("gone"), &link).unwrap();
        assert_eq!(classify(&link), EntryKind::Missing);
    }
}
