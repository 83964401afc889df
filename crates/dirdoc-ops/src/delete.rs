//! Delete operation.

use std::fs;
use std::io;
use std::path::Path;

/// Delete `path`, moving it to the trash when `use_trash` is set.
///
/// Symlinks are removed themselves, never their targets. A non-empty
/// directory is only removed when `recursive` is set.
pub(crate) fn delete(path: &Path, recursive: bool, use_trash: bool) -> io::Result<()> {
    let metadata = fs::symlink_metadata(path)?;

    if use_trash {
        return trash::delete(path).map_err(io::Error::other);
    }

    if metadata.is_dir() {
        if recursive {
            fs::remove_dir_all(path)
        } else {
            fs::remove_dir(path)
        }
    } else {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_delete_file_and_tree() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        let dir = temp.path().join("dir");
        fs::write(&file, "x").unwrap();
        fs::create_dir_all(dir.join("nested")).unwrap();

        delete(&file, true, false).unwrap();
        delete(&dir, true, false).unwrap();
        assert!(!file.exists());
        assert!(!dir.exists());
    }

    #[test]
    fn test_non_recursive_keeps_populated_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("dir");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("keep"), "x").unwrap();

        assert!(delete(&dir, false, false).is_err());
        assert!(dir.join("keep").exists());
    }

    #[test]
    fn test_delete_missing_path() {
        let temp = TempDir::new().unwrap();
        let err = delete(&temp.path().join("missing"), true, false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
