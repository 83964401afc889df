//! Asynchronous executor with uniform result handling.

use std::io;
use std::path::PathBuf;

use futures::future::join_all;
use tracing::debug;

use dirdoc_core::{ErrorKind, Platform};

use crate::{copy, create, delete, rename, symlink};
use crate::{BatchReport, FileOperation, OperationError, OperationOutcome};

/// Runs filesystem mutations off the async runtime.
///
/// Every operation resolves to `Ok(())` or a classified
/// [`OperationError`]; nothing panics or escapes as a raw I/O error.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationExecutor {
    platform: Platform,
}

impl OperationExecutor {
    /// Create an executor for the given platform capabilities.
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Create a directory.
    pub async fn create_directory(&self, path: impl Into<PathBuf>) -> OperationOutcome {
        self.execute(FileOperation::create_directory(path)).await
    }

    /// Create an empty file.
    pub async fn create_file(&self, path: impl Into<PathBuf>) -> OperationOutcome {
        self.execute(FileOperation::create_file(path)).await
    }

    /// Rename `source` to `destination`.
    pub async fn rename(
        &self,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        overwrite: bool,
    ) -> OperationOutcome {
        self.execute(FileOperation::rename(source, destination).with_overwrite(overwrite))
            .await
    }

    /// Copy `source` to `destination`.
    pub async fn copy(
        &self,
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        overwrite: bool,
        merge: bool,
    ) -> OperationOutcome {
        self.execute(
            FileOperation::copy(source, destination)
                .with_overwrite(overwrite)
                .with_merge(merge),
        )
        .await
    }

    /// Delete `path` recursively.
    pub async fn delete(&self, path: impl Into<PathBuf>, use_trash: bool) -> OperationOutcome {
        self.execute(FileOperation::delete(path, use_trash)).await
    }

    /// Create a symbolic link at `link` pointing to `target`.
    pub async fn symlink(
        &self,
        target: impl Into<PathBuf>,
        link: impl Into<PathBuf>,
    ) -> OperationOutcome {
        self.execute(FileOperation::symlink(target, link)).await
    }

    /// Run a single operation.
    pub async fn execute(&self, operation: FileOperation) -> OperationOutcome {
        if let FileOperation::Copy { merge: true, .. } = &operation {
            if !self.platform.merge_copy {
                return Err(OperationError::new(
                    &operation,
                    ErrorKind::Unsupported,
                    "merging folders is not supported on this platform",
                ));
            }
        }

        if let FileOperation::Copy { source, destination, .. }
        | FileOperation::Rename { source, destination, .. } = &operation
        {
            if destination != source && destination.starts_with(source) {
                return Err(OperationError::new(
                    &operation,
                    ErrorKind::SourceIsAncestor,
                    "a folder cannot be placed inside itself",
                ));
            }
        }

        debug!(op = %operation.operation_type(), path = %operation.path().display(), "Executing");

        let task_op = operation.clone();
        let result = tokio::task::spawn_blocking(move || apply(&task_op))
            .await
            .unwrap_or_else(|e| Err(io::Error::other(format!("Task failed: {e}"))));

        result.map_err(|e| OperationError::from_io(&operation, &e))
    }

    /// Run all operations concurrently.
    ///
    /// The report lists outcomes in submission order regardless of the order
    /// in which the operations finish. Failures are not logged here; see
    /// [`BatchReport::log_errors`].
    pub async fn execute_all(&self, operations: Vec<FileOperation>) -> BatchReport {
        let outcomes = join_all(operations.iter().cloned().map(|op| self.execute(op))).await;
        BatchReport::new(operations, outcomes)
    }
}

fn apply(operation: &FileOperation) -> io::Result<()> {
    match operation {
        FileOperation::CreateDirectory { path } => create::create_directory(path),
        FileOperation::CreateFile { path } => create::create_file(path),
        FileOperation::Rename {
            source,
            destination,
            overwrite,
        } => rename::rename(source, destination, *overwrite),
        FileOperation::Copy {
            source,
            destination,
            overwrite,
            merge,
        } => copy::copy(source, destination, *overwrite, *merge),
        FileOperation::Delete {
            path,
            recursive,
            use_trash,
        } => delete::delete(path, *recursive, *use_trash),
        FileOperation::Symlink { target, link } => symlink::symlink(target, link),
    }
}
