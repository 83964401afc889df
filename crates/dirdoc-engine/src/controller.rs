//! The controller owns all long-lived state and exposes one entry point
//! per user action.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use tokio::sync::broadcast;
use tracing::{debug, error};

use dirdoc_cache::{
    CacheEvent, DirectoryCache, DirectoryListing, LineSelection, MarkMode, MarkOutcome, NameFilter,
    SelectionContext,
};
use dirdoc_core::{Config, DirdocError, FileEntry, NameValidator, Platform, Result};
use dirdoc_ops::{FileOperation, OperationExecutor};

use crate::batch::{BatchEngine, BatchMode, BatchSession, SaveReason};
use crate::clipboard::{ClipboardEngine, ClipboardMode, ConflictPrompt};
use crate::message::ActionReport;

/// A single-entry rename, copy or symlink waiting for its new name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleEdit {
    pub mode: BatchMode,
    pub directory: PathBuf,
    pub entry: FileEntry,
    /// Names the new name must not collide with.
    pub existing_names: Vec<String>,
    /// Length in characters of the part of the name to pre-select.
    pub stem_len: usize,
}

impl SingleEdit {
    /// The name to pre-fill.
    pub fn initial_name(&self) -> &str {
        self.entry.name()
    }
}

/// How an edit action continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditStart {
    /// Prompt for one name, then call [`Controller::commit_edit`].
    Single(SingleEdit),
    /// A batch session was opened; edit `document` and save it manually.
    Batch {
        document: PathBuf,
        original: Option<PathBuf>,
        instructions: &'static str,
    },
}

/// Length of the name up to its extension; names starting with their only
/// dot have no extension.
fn stem_len(name: &str) -> usize {
    match name.rfind('.') {
        Some(i) if i > 0 => name[..i].chars().count(),
        _ => name.chars().count(),
    }
}

fn instructions(mode: BatchMode) -> &'static str {
    match mode {
        BatchMode::Create => {
            "Input file names. For folder names, add \"/\" (e.g. \"foldername/\"). \
             Save manually to execute. Close to cancel."
        }
        BatchMode::Symlink => "Edit path names. Save manually to execute. Close to cancel.",
        BatchMode::Rename | BatchMode::Copy => {
            "Edit file names. Save manually to execute. Close to cancel."
        }
    }
}

/// Owns the directory cache, the batch and clipboard engines and the
/// executor.
pub struct Controller {
    cache: DirectoryCache,
    batch: BatchEngine,
    clipboard: ClipboardEngine,
    executor: OperationExecutor,
    config: Config,
}

impl Controller {
    /// Create a controller for the host platform.
    pub fn new(config: Config) -> Self {
        Self::with_platform(config, Platform::current())
    }

    /// Create a controller with explicit platform capabilities.
    pub fn with_platform(config: Config, platform: Platform) -> Self {
        let platform = config.platform(platform);
        Self {
            cache: DirectoryCache::new(),
            batch: BatchEngine::new(config.batch_root(), platform),
            clipboard: ClipboardEngine::new(),
            executor: OperationExecutor::new(platform),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn platform(&self) -> Platform {
        self.executor.platform()
    }

    pub fn cache(&self) -> &DirectoryCache {
        &self.cache
    }

    pub fn batch(&self) -> Option<&BatchSession> {
        self.batch.session()
    }

    pub fn clipboard(&self) -> &ClipboardEngine {
        &self.clipboard
    }

    /// Subscribe to content-changed notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.cache.subscribe()
    }

    /// Read `path`, optionally resolving symlinks first. The listing's
    /// location is the path the directory is cached under.
    pub async fn open_directory(
        &mut self,
        path: &Path,
        resolve_links: bool,
    ) -> Result<&DirectoryListing> {
        let location = if resolve_links {
            tokio::fs::canonicalize(path)
                .await
                .map_err(|source| DirdocError::Resolve {
                    path: path.to_path_buf(),
                    source,
                })?
        } else {
            std::path::absolute(path).map_err(|e| DirdocError::io(path, e))?
        };
        self.cache.read(&location).await
    }

    /// Re-read `dir`.
    pub async fn refresh(&mut self, dir: &Path, clear_marks: bool) -> Result<&DirectoryListing> {
        self.cache.invalidate(dir, clear_marks);
        self.cache.read(dir).await
    }

    /// The cached listing of `dir`.
    pub fn listing(&self, dir: &Path) -> Result<&DirectoryListing> {
        self.cache.get(dir)
    }

    pub fn context(
        &self,
        dir: &Path,
        selection: LineSelection,
        filter: NameFilter,
    ) -> Result<SelectionContext> {
        self.cache.context(dir, selection, filter)
    }

    /// Mark or unmark the entries in `selection`.
    pub fn mark(
        &mut self,
        dir: &Path,
        selection: LineSelection,
        mode: MarkMode,
    ) -> Result<MarkOutcome> {
        self.cache.update_marks(dir, selection, mode)
    }

    /// Create one file or directory named `name` in `dir`.
    pub async fn create(&mut self, dir: &Path, name: &str, is_dir: bool) -> Result<ActionReport> {
        let listing = self.cache.get(dir)?;
        NameValidator::new(self.platform(), listing.entries().iter().map(FileEntry::name))
            .validate(name)
            .map_err(|reason| DirdocError::InvalidName {
                name: name.to_string(),
                reason,
            })?;

        let path = dir.join(name);
        let outcome = if is_dir {
            self.executor.create_directory(&path).await
        } else {
            self.executor.create_file(&path).await
        };
        self.cache.invalidate(dir, true);

        Ok(match outcome {
            Ok(()) => ActionReport::new(),
            Err(e) => {
                error!(kind = ?e.kind, "{}", e.message);
                ActionReport::error(e.message)
            }
        })
    }

    /// Start a rename, copy, symlink or create action.
    ///
    /// One selected entry yields a [`SingleEdit`]; several entries, or
    /// `Create`, open a batch session.
    pub fn begin_edit(
        &mut self,
        dir: &Path,
        selection: LineSelection,
        mode: BatchMode,
    ) -> Result<EditStart> {
        let context = self.cache.context(dir, selection, mode.name_filter())?;

        if mode.has_sources() {
            match context.selected.as_slice() {
                [] => return Err(DirdocError::NoSelection),
                [entry] => {
                    return Ok(EditStart::Single(SingleEdit {
                        mode,
                        directory: context.directory.clone(),
                        entry: entry.clone(),
                        existing_names: context.existing_names.clone(),
                        stem_len: stem_len(entry.name()),
                    }));
                }
                _ => {}
            }
        }

        let session = self.batch.start(mode, &context)?;
        let start = EditStart::Batch {
            document: session.document().to_path_buf(),
            original: session.original_document().map(Path::to_path_buf),
            instructions: instructions(mode),
        };
        self.cache.invalidate(dir, true);
        Ok(start)
    }

    /// Finish a single-entry edit with `new_name`.
    pub async fn commit_edit(&mut self, edit: &SingleEdit, new_name: &str) -> Result<ActionReport> {
        NameValidator::new(self.platform(), &edit.existing_names)
            .validate(new_name)
            .map_err(|reason| DirdocError::InvalidName {
                name: new_name.to_string(),
                reason,
            })?;

        let destination = edit.directory.join(new_name);
        let source = edit.entry.path();
        let operation = match edit.mode {
            BatchMode::Rename => FileOperation::rename(source, destination),
            BatchMode::Copy => FileOperation::copy(source, destination),
            BatchMode::Symlink => FileOperation::symlink(source, destination),
            BatchMode::Create => FileOperation::create_file(destination),
        };
        let outcome = self.executor.execute(operation).await;
        self.cache.invalidate(&edit.directory, true);

        Ok(match outcome {
            Ok(()) => ActionReport::new(),
            Err(e) => {
                error!(kind = ?e.kind, "{}", e.message);
                ActionReport::error(e.message)
            }
        })
    }

    /// Delete every selected entry recursively.
    pub async fn delete(
        &mut self,
        dir: &Path,
        selection: LineSelection,
        use_trash: bool,
    ) -> Result<ActionReport> {
        let context = self.cache.context(dir, selection, NameFilter::All)?;
        if context.is_empty() {
            return Err(DirdocError::NoSelection);
        }

        let operations = context
            .selected
            .iter()
            .map(|entry| FileOperation::delete(entry.path(), use_trash))
            .collect();
        let report = self.executor.execute_all(operations).await;
        self.cache.invalidate(dir, true);

        let mut out = ActionReport::new();
        if let Some(message) = report.surface() {
            out.push_error(message);
        }
        let deleted = report
            .outcomes()
            .filter(|(_, outcome)| outcome.is_ok())
            .map(|(op, _)| op.path().display().to_string())
            .join("\n");
        if !deleted.is_empty() {
            out.push_info(format!("{deleted} has been deleted."));
        }
        Ok(out)
    }

    /// Capture the selected entries for a later paste.
    pub fn set_pending(
        &mut self,
        dir: &Path,
        selection: LineSelection,
        mode: ClipboardMode,
    ) -> Result<ActionReport> {
        let context = self.cache.context(dir, selection, NameFilter::All)?;
        if context.is_empty() {
            return Err(DirdocError::NoSelection);
        }

        let paths = context
            .selected
            .iter()
            .map(|entry| entry.path().display().to_string())
            .join("\n");
        self.clipboard.set(mode, context.directory, context.selected);
        self.cache.invalidate(dir, true);

        Ok(ActionReport::info(format!("{paths} has been {}.", mode.verb())))
    }

    /// Paste the pending entries into `target`.
    pub async fn paste<P>(&mut self, target: &Path, prompt: &mut P) -> Result<ActionReport>
    where
        P: ConflictPrompt + ?Sized,
    {
        let report = self
            .clipboard
            .paste(target, &self.executor, &mut self.cache, prompt)
            .await?;

        let mut out = ActionReport::new();
        if let Some(message) = report.first_error() {
            out.push_error(message);
        }
        if report.unresolved() > 0 {
            out.push_info(format!(
                "{} existing entries were left untouched.",
                report.unresolved()
            ));
        }
        Ok(out)
    }

    /// Forward a pending save of `document` to the batch session.
    ///
    /// `Ok(None)` means the save is not one the session acts on.
    pub async fn batch_will_save(
        &mut self,
        document: &Path,
        reason: SaveReason,
        text: &str,
    ) -> Result<Option<ActionReport>> {
        let Some(report) = self
            .batch
            .will_save(document, reason, text, &self.executor, &mut self.cache)
            .await?
        else {
            return Ok(None);
        };

        let mut out = ActionReport::new();
        if let Some(err) = report.first_error() {
            out.push_error(err.message.clone());
        }
        Ok(Some(out))
    }

    /// Whether `document` should be closed after it was saved.
    pub fn batch_saved(&self, document: &Path) -> bool {
        self.batch.saved(document)
    }

    /// End the batch session if `document` is its editable list.
    pub fn document_closed(&mut self, document: &Path) -> bool {
        self.batch.closed(document).is_some()
    }

    /// Drop state tied to views that were closed.
    ///
    /// A closed directory with no remaining view is evicted from the cache.
    /// The batch session is cancelled when its document is closed or its
    /// directory loses its last view.
    pub fn views_closed(&mut self, closed: &[PathBuf], remaining: &[PathBuf]) {
        let remaining: HashSet<&Path> = remaining.iter().map(PathBuf::as_path).collect();

        for path in closed {
            if self.batch.is_document(path) {
                self.batch.end();
                continue;
            }
            if remaining.contains(path.as_path()) {
                continue;
            }
            let orphans_batch = self
                .batch
                .session()
                .is_some_and(|session| session.directory() == path);
            if orphans_batch {
                self.batch.end();
            }
            self.cache.evict(path);
        }
        debug!(closed = closed.len(), cached = self.cache.paths().count(), "Views closed");
    }
}
