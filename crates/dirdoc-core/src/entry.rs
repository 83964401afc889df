//! Directory entry types.

use std::fs::{FileType, Metadata};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Type of the object an entry resolves to, as reported by `stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Directory,
    /// Sockets, devices, fifos and the like.
    Other,
}

impl EntryKind {
    /// Classify a (link-following) file type.
    pub fn from_file_type(file_type: FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else {
            Self::Other
        }
    }
}

/// Metadata of an entry whose `stat` succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStats {
    /// Size in bytes.
    pub size: u64,
    /// Last modification time.
    pub modified: SystemTime,
    /// What the entry resolves to (symlinks are followed).
    pub kind: EntryKind,
}

impl FileStats {
    /// Build stats from link-following metadata.
    pub fn from_metadata(metadata: &Metadata) -> Self {
        Self {
            size: metadata.len(),
            modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            kind: EntryKind::from_file_type(metadata.file_type()),
        }
    }
}

/// One child of a directory.
///
/// Entries are created while reading a directory and never mutated
/// afterwards; a refresh produces new entries instead. The `location`
/// is the identity of an entry: two entries with the same location are
/// the same child.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Absolute path of the entry.
    pub location: PathBuf,

    /// Final path component, cached for display and validation.
    pub name: CompactString,

    /// Present only if `stat` succeeded.
    pub stats: Option<FileStats>,

    /// Directory flag from the directory listing.
    pub is_dir: bool,

    /// Symlink flag from the directory listing.
    pub is_symlink: bool,
}

impl FileEntry {
    /// Create an entry without stats.
    pub fn new(location: impl Into<PathBuf>, is_dir: bool, is_symlink: bool) -> Self {
        let location = location.into();
        let name = location
            .file_name()
            .map(|n| CompactString::from(n.to_string_lossy()))
            .unwrap_or_default();
        Self {
            location,
            name,
            stats: None,
            is_dir,
            is_symlink,
        }
    }

    /// Attach the result of a `stat` call.
    pub fn with_stats(mut self, stats: Option<FileStats>) -> Self {
        self.stats = stats;
        self
    }

    /// The entry's file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry's path.
    pub fn path(&self) -> &Path {
        &self.location
    }

    /// File name with a trailing `/` for directories, as written in name lists.
    pub fn list_name(&self) -> String {
        if self.is_dir {
            format!("{}/", self.name)
        } else {
            self.name.to_string()
        }
    }

    /// Whether this is a symlink whose target resolves to a file or directory.
    pub fn is_resolved_symlink(&self) -> bool {
        self.is_symlink
            && matches!(
                self.stats.map(|s| s.kind),
                Some(EntryKind::File | EntryKind::Directory)
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_name_from_location() {
        let entry = FileEntry::new("/tmp/dir/notes.txt", false, false);
        assert_eq!(entry.name(), "notes.txt");
        assert_eq!(entry.list_name(), "notes.txt");
        assert!(entry.stats.is_none());
    }

    #[test]
    fn test_directory_list_name() {
        let entry = FileEntry::new("/tmp/dir/archive", true, false);
        assert_eq!(entry.list_name(), "archive/");
    }

    #[test]
    fn test_resolved_symlink() {
        let stats = FileStats {
            size: 0,
            modified: SystemTime::UNIX_EPOCH,
            kind: EntryKind::File,
        };
        let link = FileEntry::new("/tmp/link", false, true).with_stats(Some(stats));
        assert!(link.is_resolved_symlink());

        let dangling = FileEntry::new("/tmp/dangling", false, true);
        assert!(!dangling.is_resolved_symlink());
    }
}
