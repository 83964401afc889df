//! Batch sessions driven by an editable name list.
//!
//! A session moves through [`BatchPhase`]s:
//!
//! ```text
//! Idle -> Open -> Validating -> Executing -> Completed -> Idle
//!          ^          |
//!          +----------+  (validation failed)
//! ```
//!
//! Closing the editable document while the session is `Open` cancels it
//! without touching the filesystem.

use std::path::{Path, PathBuf};

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::{debug, info};

use dirdoc_cache::{DirectoryCache, NameFilter, SelectionContext};
use dirdoc_core::{DirdocError, FileEntry, NameValidator, Platform, Result};
use dirdoc_ops::{BatchReport, FileOperation, OperationExecutor};

use crate::workspace::BatchWorkspace;

/// What a batch session does with its name list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum BatchMode {
    /// Create one file or directory per line.
    Create,
    /// Rename each selected entry to its line.
    Rename,
    /// Copy each selected entry to its line.
    Copy,
    /// Create a symlink named by each line pointing at its selected entry.
    Symlink,
}

impl BatchMode {
    /// Which names new entries must not collide with.
    ///
    /// Renamed entries may keep or swap their own names.
    pub fn name_filter(self) -> NameFilter {
        match self {
            Self::Rename => NameFilter::Unselected,
            _ => NameFilter::All,
        }
    }

    /// Whether the session acts on selected entries.
    pub fn has_sources(self) -> bool {
        self != Self::Create
    }
}

/// Why a document is being saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveReason {
    /// The user asked to save.
    Manual,
    /// Autosave or any save the user did not ask for.
    Auto,
}

/// Where a batch session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum BatchPhase {
    Idle,
    Open,
    Validating,
    Executing,
    Completed,
}

/// The single in-flight batch operation.
#[derive(Debug)]
pub struct BatchSession {
    mode: BatchMode,
    directory: PathBuf,
    sources: Vec<FileEntry>,
    existing_names: Vec<String>,
    workspace: BatchWorkspace,
    phase: BatchPhase,
}

impl BatchSession {
    pub fn mode(&self) -> BatchMode {
        self.mode
    }

    /// The directory the session acts in.
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Entries captured when the session started; empty for `Create`.
    pub fn sources(&self) -> &[FileEntry] {
        &self.sources
    }

    pub fn phase(&self) -> BatchPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == BatchPhase::Completed
    }

    /// Path of the editable name list, which identifies the document.
    pub fn document(&self) -> &Path {
        self.workspace.editable_path()
    }

    /// Path of the read-only list of original names, if any.
    pub fn original_document(&self) -> Option<&Path> {
        self.workspace.original_path()
    }

    pub fn workspace(&self) -> &BatchWorkspace {
        &self.workspace
    }

    /// Validate the edited list and turn it into filesystem operations.
    ///
    /// Nothing is executed; any violation rejects the whole list.
    pub fn plan(&self, text: &str, platform: Platform) -> Result<Vec<FileOperation>> {
        let lines = edited_lines(text);

        if self.mode.has_sources() && lines.len() != self.sources.len() {
            return Err(DirdocError::LineCountMismatch {
                expected: self.sources.len(),
                actual: lines.len(),
            });
        }

        let validator = NameValidator::new(platform, &self.existing_names);
        let mut targets = Vec::with_capacity(lines.len());
        for (i, line) in lines.into_iter().enumerate() {
            let (name, marked_dir) = match line.strip_suffix('/') {
                Some(name) => (name, true),
                None => (line, false),
            };
            validator
                .validate(name)
                .map_err(|reason| DirdocError::InvalidLine { line: i + 1, reason })?;
            targets.push((name, marked_dir));
        }

        if let Some((name, _)) = targets
            .iter()
            .duplicates_by(|(name, _)| platform.normalize_name(name))
            .next()
        {
            return Err(DirdocError::DuplicateTargetNames {
                name: name.to_string(),
            });
        }

        let operations = match self.mode {
            BatchMode::Create => targets
                .into_iter()
                .map(|(name, is_dir)| {
                    let path = self.directory.join(name);
                    if is_dir {
                        FileOperation::create_directory(path)
                    } else {
                        FileOperation::create_file(path)
                    }
                })
                .collect(),
            BatchMode::Rename => self
                .pairs(&targets)
                .map(|(source, destination)| FileOperation::rename(source, destination))
                .collect(),
            BatchMode::Copy => self
                .pairs(&targets)
                .map(|(source, destination)| FileOperation::copy(source, destination))
                .collect(),
            BatchMode::Symlink => self
                .pairs(&targets)
                .map(|(source, destination)| FileOperation::symlink(source, destination))
                .collect(),
        };
        Ok(operations)
    }

    fn pairs<'a>(
        &'a self,
        targets: &'a [(&str, bool)],
    ) -> impl Iterator<Item = (&'a Path, PathBuf)> + 'a {
        self.sources
            .iter()
            .zip(targets)
            .map(|(source, (name, _))| (source.path(), self.directory.join(name)))
    }
}

/// Lines of an edited name list. A blank last line is an editor artifact
/// and is dropped.
fn edited_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// Owns the optional batch session and drives its transitions.
#[derive(Debug)]
pub struct BatchEngine {
    session: Option<BatchSession>,
    workspace_root: PathBuf,
    platform: Platform,
}

impl BatchEngine {
    /// Create an engine that places session workspaces under `workspace_root`.
    pub fn new(workspace_root: impl Into<PathBuf>, platform: Platform) -> Self {
        Self {
            session: None,
            workspace_root: workspace_root.into(),
            platform,
        }
    }

    pub fn session(&self) -> Option<&BatchSession> {
        self.session.as_ref()
    }

    pub fn phase(&self) -> BatchPhase {
        self.session.as_ref().map_or(BatchPhase::Idle, BatchSession::phase)
    }

    /// Whether `document` is the open session's editable list.
    pub fn is_document(&self, document: &Path) -> bool {
        self.session.as_ref().is_some_and(|s| s.document() == document)
    }

    /// Open a session over `context`.
    ///
    /// Fails with `SessionBusy` if a session exists, and with `NoSelection`
    /// if a mode that needs entries has none.
    pub fn start(&mut self, mode: BatchMode, context: &SelectionContext) -> Result<&BatchSession> {
        if self.session.is_some() {
            return Err(DirdocError::SessionBusy);
        }

        let sources = if mode.has_sources() {
            context.selected.clone()
        } else {
            Vec::new()
        };
        if mode.has_sources() && sources.is_empty() {
            return Err(DirdocError::NoSelection);
        }

        let names = mode
            .has_sources()
            .then(|| sources.iter().map(FileEntry::list_name).join("\n"));
        let workspace = BatchWorkspace::create(&self.workspace_root, names.as_deref())
            .map_err(|e| DirdocError::io(&self.workspace_root, e))?;

        debug!(
            %mode,
            directory = %context.directory.display(),
            entries = sources.len(),
            document = %workspace.editable_path().display(),
            "Batch session opened"
        );

        Ok(&*self.session.insert(BatchSession {
            mode,
            directory: context.directory.clone(),
            sources,
            existing_names: context.existing_names.clone(),
            workspace,
            phase: BatchPhase::Open,
        }))
    }

    /// Handle a save of `document` that is about to happen.
    ///
    /// Only manual saves of the open session's document are acted on; any
    /// other save returns `Ok(None)`. A validation failure is returned and
    /// leaves the session open. Otherwise the operations run concurrently,
    /// the session completes and the directory is invalidated with its marks
    /// cleared.
    pub async fn will_save(
        &mut self,
        document: &Path,
        reason: SaveReason,
        text: &str,
        executor: &OperationExecutor,
        cache: &mut DirectoryCache,
    ) -> Result<Option<BatchReport>> {
        let Some(session) = self.session.as_mut().filter(|s| s.document() == document) else {
            return Ok(None);
        };
        if reason != SaveReason::Manual || session.phase != BatchPhase::Open {
            debug!(?reason, phase = %session.phase, "Ignoring save");
            return Ok(None);
        }

        session.phase = BatchPhase::Validating;
        let operations = match session.plan(text, self.platform) {
            Ok(operations) => operations,
            Err(e) => {
                debug!(error = %e, "Batch validation failed");
                session.phase = BatchPhase::Open;
                return Err(e);
            }
        };

        session.phase = BatchPhase::Executing;
        let report = executor.execute_all(operations).await;
        report.log_errors();

        session.phase = BatchPhase::Completed;
        info!(
            mode = %session.mode,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch executed"
        );
        cache.invalidate(&session.directory, true);

        Ok(Some(report))
    }

    /// Handle a completed save of `document`. Returns whether the document
    /// should now be closed.
    pub fn saved(&self, document: &Path) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| s.document() == document && s.is_completed())
    }

    /// Handle the closing of `document`, ending the session it belongs to.
    ///
    /// Returns the phase the session was in, or `None` if `document` is not
    /// the session's.
    pub fn closed(&mut self, document: &Path) -> Option<BatchPhase> {
        if !self.is_document(document) {
            return None;
        }
        self.end()
    }

    /// End the session, whatever its phase.
    pub fn end(&mut self) -> Option<BatchPhase> {
        let session = self.session.take()?;
        if session.is_completed() {
            debug!(document = %session.document().display(), "Batch session finished");
        } else {
            info!(mode = %session.mode, "Batch session cancelled");
        }
        Some(session.phase)
    }
}
