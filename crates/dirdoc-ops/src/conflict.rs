//! Conflict detection and resolution for paste operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::FileOperation;

/// An operation that failed because its destination was occupied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The source path being operated on.
    pub source: PathBuf,
    /// The occupied destination.
    pub destination: PathBuf,
    /// Whether the source entry is a directory.
    pub is_dir: bool,
}

impl Conflict {
    /// Create a new conflict.
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>, is_dir: bool) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            is_dir,
        }
    }

    /// Describe the conflict raised by a two-path operation.
    pub fn from_operation(operation: &FileOperation, is_dir: bool) -> Option<Self> {
        operation
            .destination()
            .map(|destination| Self::new(operation.path(), destination, is_dir))
    }
}

/// How the user chose to resolve a set of conflicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, Serialize, Deserialize)]
pub enum ConflictResolution {
    /// Replace existing destinations.
    Overwrite,
    /// Replace files, merge the contents of directories.
    #[strum(to_string = "Overwrite (Merge Folders)")]
    OverwriteMerge,
    /// Leave the conflicting entries alone.
    Skip,
}

impl ConflictResolution {
    /// Whether conflicting entries are retried.
    pub fn overwrites(self) -> bool {
        !matches!(self, Self::Skip)
    }

    /// Whether directory entries are merged rather than replaced.
    pub fn merges(self) -> bool {
        matches!(self, Self::OverwriteMerge)
    }

    /// Resolutions to offer for `conflicts`.
    ///
    /// Merging is only offered when the platform supports it and at least one
    /// conflicting entry is a directory.
    pub fn choices(merge_available: bool, conflicts: &[Conflict]) -> Vec<Self> {
        let offer_merge = merge_available && conflicts.iter().any(|c| c.is_dir);
        Self::iter()
            .filter(|resolution| offer_merge || !resolution.merges())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_labels() {
        assert_eq!(ConflictResolution::Overwrite.to_string(), "Overwrite");
        assert_eq!(
            ConflictResolution::OverwriteMerge.to_string(),
            "Overwrite (Merge Folders)"
        );
        assert_eq!(ConflictResolution::Skip.to_string(), "Skip");
    }

    #[test]
    fn test_merge_offered_for_directories_only() {
        let files = [Conflict::new("/a/f", "/b/f", false)];
        let mixed = [
            Conflict::new("/a/f", "/b/f", false),
            Conflict::new("/a/d", "/b/d", true),
        ];

        assert_eq!(
            ConflictResolution::choices(true, &files),
            vec![ConflictResolution::Overwrite, ConflictResolution::Skip]
        );
        assert_eq!(
            ConflictResolution::choices(true, &mixed),
            vec![
                ConflictResolution::Overwrite,
                ConflictResolution::OverwriteMerge,
                ConflictResolution::Skip
            ]
        );
        assert_eq!(ConflictResolution::choices(false, &mixed).len(), 2);
    }

    #[test]
    fn test_conflict_from_operation() {
        let op = FileOperation::copy("/a/x", "/b/x");
        let conflict = Conflict::from_operation(&op, true).unwrap();
        assert_eq!(conflict.destination, PathBuf::from("/b/x"));
        assert!(Conflict::from_operation(&FileOperation::create_file("/a"), false).is_none());
    }
}
