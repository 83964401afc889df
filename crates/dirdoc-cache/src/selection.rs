//! Line ranges to entry indices, and marking.
//!
//! A directory document has a header on line 0 and entry `i` on line
//! `i + 1`. Line numbers here are 0-based document lines.

use std::collections::BTreeSet;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tracing::debug;

use dirdoc_core::{FileEntry, Result};

use crate::{DirectoryCache, DirectoryListing};

/// How a mark command changes the marked set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
pub enum MarkMode {
    /// Mark every entry in range.
    On,
    /// Unmark every entry in range.
    Off,
    /// Unmark the range if it is fully marked, otherwise mark all of it.
    Toggle,
    /// `Toggle` over every entry of the directory.
    ToggleAll,
}

/// Cursor and selection in a directory document.
///
/// `start` and `end` are the lines the selection starts and ends on; both
/// are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineSelection {
    pub cursor: usize,
    pub start: usize,
    pub end: usize,
}

impl LineSelection {
    /// A bare cursor on `line`.
    pub fn at(line: usize) -> Self {
        Self {
            cursor: line,
            start: line,
            end: line,
        }
    }

    /// A selection from line `start` to line `end`, cursor on `end`.
    pub fn lines(start: usize, end: usize) -> Self {
        Self {
            cursor: end,
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Index of the entry under the cursor.
    pub fn focused_index(&self, entry_count: usize) -> Option<usize> {
        (1..=entry_count).contains(&self.cursor).then(|| self.cursor - 1)
    }

    /// Entry indices covered by the selection, clamped to `entry_count`.
    pub fn entry_range(&self, entry_count: usize) -> Range<usize> {
        let end = self.end.min(entry_count);
        let start = self.start.saturating_sub(1).min(end);
        start..end
    }
}

/// Result of a mark command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MarkOutcome {
    /// The marked set was rewritten and views were notified.
    pub changed: bool,
    /// The selection stopped short of the last entry; the view should move
    /// the cursor down one line.
    pub advance_cursor: bool,
}

/// Which names count as already taken in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameFilter {
    /// Every entry's name.
    #[default]
    All,
    /// Names of entries that are not selected.
    Unselected,
}

/// What an action acts on, resolved against a cached listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionContext {
    /// The directory shown by the document.
    pub directory: PathBuf,
    /// Entry under the cursor.
    pub focused: Option<FileEntry>,
    /// Marked entries, or the entries in the selected lines when nothing is marked.
    pub selected: Vec<FileEntry>,
    /// Names new entries must not collide with.
    pub existing_names: Vec<String>,
}

impl SelectionContext {
    pub fn new(listing: &DirectoryListing, selection: LineSelection, filter: NameFilter) -> Self {
        let selected_indices: BTreeSet<usize> = if listing.marked().is_empty() {
            selection.entry_range(listing.len()).collect()
        } else {
            listing.marked().iter().copied().collect()
        };

        let existing_names = listing
            .entries()
            .iter()
            .enumerate()
            .filter(|(i, _)| filter == NameFilter::All || !selected_indices.contains(i))
            .map(|(_, entry)| entry.name().to_string())
            .collect();

        Self {
            directory: listing.location().to_path_buf(),
            focused: selection
                .focused_index(listing.len())
                .and_then(|i| listing.entry(i))
                .cloned(),
            selected: selected_indices
                .iter()
                .filter_map(|&i| listing.entry(i))
                .cloned()
                .collect(),
            existing_names,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

impl DirectoryCache {
    /// Resolve a selection against the cached listing of `path`.
    pub fn context(
        &self,
        path: &Path,
        selection: LineSelection,
        filter: NameFilter,
    ) -> Result<SelectionContext> {
        Ok(SelectionContext::new(self.get(path)?, selection, filter))
    }

    /// Apply a mark command to the cached listing of `path`.
    ///
    /// A selection ending on the header line widens to the whole directory.
    /// An empty range changes nothing and sends no notification.
    pub fn update_marks(
        &mut self,
        path: &Path,
        selection: LineSelection,
        mode: MarkMode,
    ) -> Result<MarkOutcome> {
        let listing = self.get_mut(path)?;
        let count = listing.len();

        let (range, advance_cursor) = if mode == MarkMode::ToggleAll || selection.end == 0 {
            (0..count, false)
        } else {
            (selection.entry_range(count), selection.end < count)
        };

        if range.is_empty() {
            return Ok(MarkOutcome {
                changed: false,
                advance_cursor,
            });
        }

        let should_mark = match mode {
            MarkMode::On => true,
            MarkMode::Off => false,
            MarkMode::Toggle | MarkMode::ToggleAll => {
                let marked_in_range = listing
                    .marked()
                    .iter()
                    .filter(|&&i| range.contains(&i))
                    .count();
                marked_in_range != range.len()
            }
        };

        let mut marks: BTreeSet<usize> = listing.marked().iter().copied().collect();
        if should_mark {
            marks.extend(range.clone());
        } else {
            marks.retain(|i| !range.contains(i));
        }
        listing.set_marks(marks);

        debug!(path = %path.display(), %mode, ?range, should_mark, "Updated marks");
        self.notify(path);

        Ok(MarkOutcome {
            changed: true,
            advance_cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn listing(count: usize) -> DirectoryListing {
        let entries = (0..count)
            .map(|i| FileEntry::new(format!("/d/f{i}"), false, false))
            .collect();
        DirectoryListing::new("/d", entries)
    }

    #[test]
    fn test_entry_range_translation() {
        assert_eq!(LineSelection::lines(2, 4).entry_range(10), 1..4);
        assert_eq!(LineSelection::at(0).entry_range(10), 0..0);
        assert_eq!(LineSelection::lines(3, 20).entry_range(5), 2..5);
        assert_eq!(LineSelection::at(1).entry_range(5), 0..1);
    }

    #[test]
    fn test_focused_index() {
        assert_eq!(LineSelection::at(0).focused_index(3), None);
        assert_eq!(LineSelection::at(1).focused_index(3), Some(0));
        assert_eq!(LineSelection::at(3).focused_index(3), Some(2));
        assert_eq!(LineSelection::at(4).focused_index(3), None);
    }

    #[test]
    fn test_context_prefers_marks() {
        let mut listing = listing(4);
        let ctx = SelectionContext::new(&listing, LineSelection::lines(1, 2), NameFilter::Unselected);
        let names: Vec<&str> = ctx.selected.iter().map(FileEntry::name).collect();
        assert_eq!(names, ["f0", "f1"]);
        assert_eq!(ctx.existing_names, ["f2", "f3"]);

        listing.set_marks([3]);
        let ctx = SelectionContext::new(&listing, LineSelection::lines(1, 2), NameFilter::All);
        let names: Vec<&str> = ctx.selected.iter().map(FileEntry::name).collect();
        assert_eq!(names, ["f3"]);
        assert_eq!(ctx.existing_names.len(), 4);
        assert_eq!(ctx.focused.as_ref().map(FileEntry::name), Some("f1"));
    }

    #[test]
    fn test_mark_mode_parse() {
        assert_eq!(MarkMode::from_str("toggle-all").unwrap(), MarkMode::ToggleAll);
        assert_eq!(MarkMode::On.to_string(), "on");
    }
}
