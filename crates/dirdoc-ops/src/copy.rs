//! Copy and merge-copy.

use std::fs;
use std::io;
use std::path::Path;

use crate::paths::{already_exists, exists, remove_entry, same_entry};

/// Copy `source` to `destination`.
///
/// Without `merge`, an existing destination is replaced (when `overwrite`)
/// or reported as `AlreadyExists`. With `merge`, directory sources are
/// combined into an existing destination tree; files already present in
/// the destination are replaced only when `overwrite` is set.
///
/// Symlinks inside a copied tree are recreated as links. A merge follows
/// them instead, so the destination receives copies of the linked files
/// and folders.
pub(crate) fn copy(source: &Path, destination: &Path, overwrite: bool, merge: bool) -> io::Result<()> {
    let metadata = fs::metadata(source)?;

    if merge && metadata.is_dir() {
        return merge_dir(source, destination, overwrite);
    }

    if exists(destination) {
        if !overwrite {
            return Err(already_exists(destination));
        }
        if same_entry(source, destination) {
            return Ok(());
        }
        remove_entry(destination)?;
    }

    if metadata.is_dir() {
        copy_dir_recursive(source, destination)
    } else {
        fs::copy(source, destination).map(drop)
    }
}

/// Recursively copy a directory, recreating symlinks instead of following them.
fn copy_dir_recursive(source: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir(dest)?;

    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let path = entry.path();
        let dest_path = dest.join(entry.file_name());
        let file_type = entry.file_type()?;

        if file_type.is_symlink() {
            copy_symlink(&path, &dest_path)?;
        } else if file_type.is_dir() {
            copy_dir_recursive(&path, &dest_path)?;
        } else {
            fs::copy(&path, &dest_path)?;
        }
    }

    Ok(())
}

#[cfg(unix)]
fn copy_symlink(link: &Path, dest: &Path) -> io::Result<()> {
    let target = fs::read_link(link)?;
    std::os::unix::fs::symlink(target, dest)
}

#[cfg(not(unix))]
fn copy_symlink(link: &Path, dest: &Path) -> io::Result<()> {
    if link.is_dir() {
        copy_dir_recursive(link, dest)
    } else {
        fs::copy(link, dest).map(drop)
    }
}

/// Merge the contents of `source` into `destination`.
fn merge_dir(source: &Path, destination: &Path, overwrite: bool) -> io::Result<()> {
    if exists(destination) && !destination.is_dir() {
        if !overwrite {
            return Err(already_exists(destination));
        }
        remove_entry(destination)?;
    }
    fs::create_dir_all(destination)?;

    let mut options = fs_extra::dir::CopyOptions::new();
    options.overwrite = overwrite;
    options.content_only = true;

    fs_extra::dir::copy(source, destination, &options)
        .map(drop)
        .map_err(into_io_error)
}

fn into_io_error(error: fs_extra::error::Error) -> io::Error {
    use fs_extra::error::ErrorKind;

    let message = error.to_string();
    let kind = match error.kind {
        ErrorKind::Io(inner) => return inner,
        ErrorKind::NotFound => io::ErrorKind::NotFound,
        ErrorKind::PermissionDenied => io::ErrorKind::PermissionDenied,
        ErrorKind::AlreadyExists => io::ErrorKind::AlreadyExists,
        _ => io::ErrorKind::Other,
    };
    io::Error::new(kind, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_refuses_existing_without_overwrite() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.txt");
        let dst = temp.path().join("b.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&dst, "old").unwrap();

        let err = copy(&src, &dst, false, false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(&dst).unwrap(), "old");

        copy(&src, &dst, true, false).unwrap();
        assert_eq!(fs::read_to_string(&dst).unwrap(), "new");
    }

    #[test]
    fn test_copy_directory_tree() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("nested/file.txt"), "content").unwrap();

        let dst = temp.path().join("dst");
        copy(&src, &dst, false, false).unwrap();
        assert_eq!(fs::read_to_string(dst.join("nested/file.txt")).unwrap(), "content");
    }

    #[test]
    fn test_overwrite_replaces_directory() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        fs::create_dir(&src).unwrap();
        fs::create_dir(&dst).unwrap();
        fs::write(src.join("a"), "a").unwrap();
        fs::write(dst.join("b"), "b").unwrap();

        copy(&src, &dst, true, false).unwrap();
        assert!(dst.join("a").exists());
        assert!(!dst.join("b").exists());
    }

    #[test]
    fn test_merge_combines_trees() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        fs::create_dir_all(src.join("sub")).unwrap();
        fs::create_dir_all(dst.join("sub")).unwrap();
        fs::write(src.join("sub/shared.txt"), "new").unwrap();
        fs::write(dst.join("sub/shared.txt"), "old").unwrap();
        fs::write(dst.join("keep.txt"), "keep").unwrap();

        copy(&src, &dst, true, true).unwrap();
        assert_eq!(fs::read_to_string(dst.join("sub/shared.txt")).unwrap(), "new");
        assert_eq!(fs::read_to_string(dst.join("keep.txt")).unwrap(), "keep");
    }

    #[test]
    fn test_merge_without_overwrite_reports_conflict() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");
        fs::create_dir(&src).unwrap();
        fs::create_dir(&dst).unwrap();
        fs::write(src.join("f"), "new").unwrap();
        fs::write(dst.join("f"), "old").unwrap();

        let err = copy(&src, &dst, false, true).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read_to_string(dst.join("f")).unwrap(), "old");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_recreates_links_while_merge_follows_them() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        fs::create_dir(&src).unwrap();
        fs::write(temp.path().join("target.txt"), "linked").unwrap();
        std::os::unix::fs::symlink(temp.path().join("target.txt"), src.join("link")).unwrap();

        let copied = temp.path().join("copied");
        copy(&src, &copied, false, false).unwrap();
        assert!(fs::symlink_metadata(copied.join("link")).unwrap().file_type().is_symlink());

        let merged = temp.path().join("merged");
        fs::create_dir(&merged).unwrap();
        copy(&src, &merged, true, true).unwrap();
        let metadata = fs::symlink_metadata(merged.join("link")).unwrap();
        assert!(metadata.is_file());
        assert_eq!(fs::read_to_string(merged.join("link")).unwrap(), "linked");
    }
}
