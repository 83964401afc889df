//! A cached directory listing.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use dirdoc_core::{sort_entries, FileEntry};

/// One directory's entries in display order, plus its marked entries.
///
/// `marked` always holds ascending, duplicate-free indices that are valid
/// for `entries`; every mutator goes through [`DirectoryListing::set_marks`].
#[derive(Debug, Clone, Default, Serialize)]
pub struct DirectoryListing {
    location: PathBuf,
    entries: Vec<FileEntry>,
    marked: Vec<usize>,
    stale: bool,
}

impl DirectoryListing {
    /// Build a listing, sorting `entries` into display order.
    pub fn new(location: impl Into<PathBuf>, mut entries: Vec<FileEntry>) -> Self {
        sort_entries(&mut entries);
        Self {
            location: location.into(),
            entries,
            marked: Vec::new(),
            stale: false,
        }
    }

    /// The directory's path.
    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn entries(&self) -> &[FileEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&FileEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indices of marked entries, ascending.
    pub fn marked(&self) -> &[usize] {
        &self.marked
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.binary_search(&index).is_ok()
    }

    /// Marked entries in display order.
    pub fn marked_entries(&self) -> impl Iterator<Item = &FileEntry> {
        self.marked.iter().filter_map(|&i| self.entries.get(i))
    }

    /// Whether the next read must re-scan the directory.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub(crate) fn mark_stale(&mut self) {
        self.stale = true;
    }

    /// Replace the marks. Out-of-range indices are dropped.
    pub fn set_marks(&mut self, marks: impl IntoIterator<Item = usize>) {
        let len = self.entries.len();
        let mut marks: Vec<usize> = marks.into_iter().filter(|&i| i < len).collect();
        marks.sort_unstable();
        marks.dedup();
        self.marked = marks;
    }

    pub fn clear_marks(&mut self) {
        self.marked.clear();
    }

    /// Carry marks over from a previous listing of the same directory.
    ///
    /// Each previously marked entry is looked up by location; entries that
    /// no longer exist are dropped.
    pub(crate) fn remap_marks(&mut self, previous: &DirectoryListing) {
        let index_of: HashMap<&Path, usize> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (entry.path(), i))
            .collect();
        let marks: Vec<usize> = previous
            .marked_entries()
            .filter_map(|entry| index_of.get(entry.path()).copied())
            .collect();
        self.set_marks(marks);
    }
}
