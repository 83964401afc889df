//! Pending move/copy/symlink and paste with conflict resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, error, info};

use dirdoc_cache::DirectoryCache;
use dirdoc_core::{DirdocError, FileEntry, Result};
use dirdoc_ops::{BatchReport, Conflict, ConflictResolution, FileOperation, OperationExecutor};

/// What a paste does with the pending entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum ClipboardMode {
    /// Move the entries (cut).
    Move,
    /// Copy the entries (yank).
    Copy,
    /// Create symlinks pointing at the entries (target).
    Symlink,
}

impl ClipboardMode {
    /// Past participle used in user messages.
    pub fn verb(self) -> &'static str {
        match self {
            Self::Move => "cut",
            Self::Copy => "copied",
            Self::Symlink => "targeted",
        }
    }

    /// Whether conflicts can be resolved by retrying with overwrite.
    pub fn resolves_conflicts(self) -> bool {
        self != Self::Symlink
    }

    fn operation(self, source: &Path, destination: PathBuf) -> FileOperation {
        match self {
            Self::Move => FileOperation::rename(source, destination),
            Self::Copy => FileOperation::copy(source, destination),
            Self::Symlink => FileOperation::symlink(source, destination),
        }
    }
}

/// Entries captured for a later paste.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOperation {
    pub mode: ClipboardMode,
    /// Directory the entries were captured from.
    pub source_directory: PathBuf,
    /// Snapshot of the entries; never re-read.
    pub entries: Vec<FileEntry>,
}

impl PendingOperation {
    /// Where `entry` lands when pasted into `target`.
    pub fn destination(&self, entry: &FileEntry, target: &Path) -> PathBuf {
        match entry.path().strip_prefix(&self.source_directory) {
            Ok(relative) => target.join(relative),
            Err(_) => target.join(entry.name()),
        }
    }
}

/// Asks the user how to resolve paste conflicts.
pub trait ConflictPrompt {
    /// Pick one of `choices` for `conflicts`; `None` if the prompt was dismissed.
    fn resolve(
        &mut self,
        conflicts: &[Conflict],
        choices: &[ConflictResolution],
    ) -> Option<ConflictResolution>;
}

impl<F> ConflictPrompt for F
where
    F: FnMut(&[Conflict], &[ConflictResolution]) -> Option<ConflictResolution>,
{
    fn resolve(
        &mut self,
        conflicts: &[Conflict],
        choices: &[ConflictResolution],
    ) -> Option<ConflictResolution> {
        self(conflicts, choices)
    }
}

/// Everything that happened during one paste.
#[derive(Debug)]
pub struct PasteReport {
    pub mode: ClipboardMode,
    /// The first attempt, without overwrite.
    pub initial: BatchReport,
    /// Entries whose destination was occupied.
    pub conflicts: Vec<Conflict>,
    /// The user's choice, if they were asked and answered.
    pub resolution: Option<ConflictResolution>,
    /// The retry of the conflicting entries, if one ran.
    pub retry: Option<BatchReport>,
}

impl PasteReport {
    /// Number of entries that ended up pasted.
    pub fn pasted(&self) -> usize {
        self.initial.succeeded() + self.retry.as_ref().map_or(0, BatchReport::succeeded)
    }

    /// Conflicts left untouched because the user skipped or dismissed them.
    pub fn unresolved(&self) -> usize {
        if self.retry.is_some() {
            0
        } else {
            self.conflicts.len()
        }
    }

    /// The one message to show the user: the first failure of the retry,
    /// else the first non-conflict failure of the first attempt.
    pub fn first_error(&self) -> Option<&str> {
        self.retry
            .as_ref()
            .and_then(BatchReport::first_error)
            .or_else(|| self.initial.errors().find(|e| !e.is_conflict()))
            .map(|e| e.message.as_str())
    }
}

/// Holds at most one pending operation.
#[derive(Debug, Default)]
pub struct ClipboardEngine {
    pending: Option<PendingOperation>,
}

impl ClipboardEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture `entries`, replacing whatever was pending.
    pub fn set(
        &mut self,
        mode: ClipboardMode,
        source_directory: impl Into<PathBuf>,
        entries: Vec<FileEntry>,
    ) -> &PendingOperation {
        let pending = PendingOperation {
            mode,
            source_directory: source_directory.into(),
            entries,
        };
        debug!(%mode, entries = pending.entries.len(), "Pending operation set");
        self.pending.insert(pending)
    }

    pub fn pending(&self) -> Option<&PendingOperation> {
        self.pending.as_ref()
    }

    pub fn clear(&mut self) -> Option<PendingOperation> {
        self.pending.take()
    }

    /// Paste the pending entries into `target`.
    ///
    /// Rejected without touching the filesystem when nothing is pending or
    /// `target` is the source directory; the pending operation is kept in
    /// both cases. Otherwise every entry is attempted concurrently without
    /// overwrite. If some destinations are occupied and the mode allows it,
    /// `prompt` is asked once and the conflicting entries are retried with
    /// overwrite. The pending operation is cleared and `target` is
    /// invalidated with its marks cleared.
    pub async fn paste<P>(
        &mut self,
        target: &Path,
        executor: &OperationExecutor,
        cache: &mut DirectoryCache,
        prompt: &mut P,
    ) -> Result<PasteReport>
    where
        P: ConflictPrompt + ?Sized,
    {
        let pending = self.pending.as_ref().ok_or(DirdocError::NothingPending)?;
        if pending.source_directory == target {
            return Err(DirdocError::SameParent {
                path: target.to_path_buf(),
            });
        }
        let pending = self.pending.take().ok_or(DirdocError::NothingPending)?;
        let mode = pending.mode;

        let operations: Vec<FileOperation> = pending
            .entries
            .iter()
            .map(|entry| mode.operation(entry.path(), pending.destination(entry, target)))
            .collect();
        let initial = executor.execute_all(operations).await;

        for err in initial.errors().filter(|e| !e.is_conflict()) {
            error!(kind = ?err.kind, "{}", err.message);
        }

        let (conflicts, retry_operations): (Vec<Conflict>, Vec<FileOperation>) = initial
            .conflicts()
            .filter_map(|(i, op)| {
                let is_dir = pending.entries.get(i).is_some_and(|e| e.is_dir);
                Conflict::from_operation(op, is_dir).map(|c| (c, op.clone()))
            })
            .unzip();

        let resolution = if !conflicts.is_empty() && mode.resolves_conflicts() {
            let merge_available = mode == ClipboardMode::Copy && executor.platform().merge_copy;
            let choices = ConflictResolution::choices(merge_available, &conflicts);
            prompt
                .resolve(&conflicts, &choices)
                .filter(|choice| choices.contains(choice))
        } else {
            None
        };

        let retry = match resolution {
            Some(choice) if choice.overwrites() => {
                let operations = retry_operations
                    .into_iter()
                    .zip(&conflicts)
                    .map(|(op, conflict)| {
                        op.with_overwrite(true)
                            .with_merge(choice.merges() && conflict.is_dir)
                    })
                    .collect();
                let report = executor.execute_all(operations).await;
                report.log_errors();
                Some(report)
            }
            _ => None,
        };

        info!(
            %mode,
            target = %target.display(),
            conflicts = conflicts.len(),
            resolution = ?resolution,
            "Paste finished"
        );

        cache.invalidate(target, true);
        if mode == ClipboardMode::Move {
            cache.invalidate(&pending.source_directory, false);
        }

        Ok(PasteReport {
            mode,
            initial,
            conflicts,
            resolution,
            retry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_is_rerooted() {
        let pending = PendingOperation {
            mode: ClipboardMode::Copy,
            source_directory: PathBuf::from("/src"),
            entries: vec![FileEntry::new("/src/a.txt", false, false)],
        };
        assert_eq!(
            pending.destination(&pending.entries[0], Path::new("/dst")),
            PathBuf::from("/dst/a.txt")
        );
    }

    #[test]
    fn test_set_replaces_pending() {
        let mut clipboard = ClipboardEngine::new();
        clipboard.set(ClipboardMode::Copy, "/a", vec![FileEntry::new("/a/x", false, false)]);
        clipboard.set(ClipboardMode::Move, "/b", vec![FileEntry::new("/b/y", false, false)]);

        let pending = clipboard.pending().unwrap();
        assert_eq!(pending.mode, ClipboardMode::Move);
        assert_eq!(pending.source_directory, PathBuf::from("/b"));
    }

    #[test]
    fn test_symlink_mode_has_no_resolution() {
        assert!(!ClipboardMode::Symlink.resolves_conflicts());
        assert_eq!(ClipboardMode::Move.verb(), "cut");
    }
}
