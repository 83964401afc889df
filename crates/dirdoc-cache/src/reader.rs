//! Reading a directory into entries.

use std::fs::FileType;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use tracing::{debug, warn};

use dirdoc_core::{sort_entries, DirdocError, EntryKind, FileEntry, FileStats, Result};

/// List the children of `path` and stat each of them concurrently.
///
/// Failing to list the directory fails the whole read. Failing to stat a
/// single child keeps that child without stats. The result is sorted in
/// display order.
pub async fn read_directory(path: &Path) -> Result<Vec<FileEntry>> {
    let mut dir = tokio::fs::read_dir(path)
        .await
        .map_err(|e| DirdocError::io(path, e))?;

    let mut children = Vec::new();
    while let Some(entry) = dir.next_entry().await.map_err(|e| DirdocError::io(path, e))? {
        let file_type = entry.file_type().await.ok();
        children.push((entry.path(), file_type));
    }

    let mut entries = join_all(
        children
            .into_iter()
            .map(|(child, file_type)| read_entry(child, file_type)),
    )
    .await;
    sort_entries(&mut entries);

    debug!(path = %path.display(), entries = entries.len(), "Read directory");
    Ok(entries)
}

async fn read_entry(path: PathBuf, file_type: Option<FileType>) -> FileEntry {
    let is_symlink = file_type.is_some_and(|t| t.is_symlink());

    let stats = match tokio::fs::metadata(&path).await {
        Ok(metadata) => Some(FileStats::from_metadata(&metadata)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Could not stat entry");
            None
        }
    };

    // Symlinked directories are listed as directories when their target resolves.
    let is_dir = file_type.is_some_and(|t| t.is_dir())
        || (is_symlink && stats.is_some_and(|s| s.kind == EntryKind::Directory));

    FileEntry::new(path, is_dir, is_symlink).with_stats(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_sorts_directories_first() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("b.txt"), "hello").unwrap();
        fs::write(temp.path().join("a.txt"), "").unwrap();
        fs::create_dir(temp.path().join("z")).unwrap();

        let entries = read_directory(temp.path()).await.unwrap();
        let names: Vec<&str> = entries.iter().map(FileEntry::name).collect();
        assert_eq!(names, ["z", "a.txt", "b.txt"]);
        assert_eq!(entries[2].stats.map(|s| s.size), Some(5));
    }

    #[tokio::test]
    async fn test_missing_directory_fails() {
        let temp = TempDir::new().unwrap();
        let err = read_directory(&temp.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, DirdocError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_has_no_stats() {
        let temp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(temp.path().join("gone"), temp.path().join("link")).unwrap();

        let entries = read_directory(temp.path()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_symlink);
        assert!(!entries[0].is_dir);
        assert!(entries[0].stats.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_directory_is_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("real")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("alias")).unwrap();

        let entries = read_directory(temp.path()).await.unwrap();
        assert!(entries.iter().all(|e| e.is_dir));
        assert!(entries.iter().any(FileEntry::is_resolved_symlink));
    }
}
