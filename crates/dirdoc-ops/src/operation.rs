//! File operation types.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strum::Display;
use thiserror::Error;

use dirdoc_core::ErrorKind;

/// The type of operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum OperationType {
    #[strum(to_string = "Create directory")]
    CreateDirectory,
    #[strum(to_string = "Create file")]
    CreateFile,
    Rename,
    Copy,
    Delete,
    Symlink,
}

/// A single filesystem mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileOperation {
    /// Create a directory; fails if anything exists at `path`.
    CreateDirectory { path: PathBuf },
    /// Create an empty file; fails if anything exists at `path`.
    CreateFile { path: PathBuf },
    /// Rename (move) `source` to `destination`.
    Rename {
        source: PathBuf,
        destination: PathBuf,
        overwrite: bool,
    },
    /// Copy `source` to `destination`, merging directory trees if `merge`.
    Copy {
        source: PathBuf,
        destination: PathBuf,
        overwrite: bool,
        merge: bool,
    },
    /// Delete `path`.
    Delete {
        path: PathBuf,
        recursive: bool,
        use_trash: bool,
    },
    /// Create a symbolic link at `link` pointing to `target`. Never overwrites.
    Symlink { target: PathBuf, link: PathBuf },
}

impl FileOperation {
    /// Create a directory creation operation.
    pub fn create_directory(path: impl Into<PathBuf>) -> Self {
        Self::CreateDirectory { path: path.into() }
    }

    /// Create a file creation operation.
    pub fn create_file(path: impl Into<PathBuf>) -> Self {
        Self::CreateFile { path: path.into() }
    }

    /// Create a rename operation that refuses to overwrite.
    pub fn rename(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::Rename {
            source: source.into(),
            destination: destination.into(),
            overwrite: false,
        }
    }

    /// Create a copy operation that refuses to overwrite.
    pub fn copy(source: impl Into<PathBuf>, destination: impl Into<PathBuf>) -> Self {
        Self::Copy {
            source: source.into(),
            destination: destination.into(),
            overwrite: false,
            merge: false,
        }
    }

    /// Create a recursive delete operation.
    pub fn delete(path: impl Into<PathBuf>, use_trash: bool) -> Self {
        Self::Delete {
            path: path.into(),
            recursive: true,
            use_trash,
        }
    }

    /// Create a symlink operation.
    pub fn symlink(target: impl Into<PathBuf>, link: impl Into<PathBuf>) -> Self {
        Self::Symlink {
            target: target.into(),
            link: link.into(),
        }
    }

    /// Allow replacing an existing destination. No effect on other operations.
    pub fn with_overwrite(mut self, value: bool) -> Self {
        if let Self::Rename { overwrite, .. } | Self::Copy { overwrite, .. } = &mut self {
            *overwrite = value;
        }
        self
    }

    /// Merge directory trees instead of replacing them. Copy only.
    pub fn with_merge(mut self, value: bool) -> Self {
        if let Self::Copy { merge, .. } = &mut self {
            *merge = value;
        }
        self
    }

    /// The kind of this operation.
    pub fn operation_type(&self) -> OperationType {
        match self {
            Self::CreateDirectory { .. } => OperationType::CreateDirectory,
            Self::CreateFile { .. } => OperationType::CreateFile,
            Self::Rename { .. } => OperationType::Rename,
            Self::Copy { .. } => OperationType::Copy,
            Self::Delete { .. } => OperationType::Delete,
            Self::Symlink { .. } => OperationType::Symlink,
        }
    }

    /// The path acted on (the source for two-path operations).
    pub fn path(&self) -> &Path {
        match self {
            Self::CreateDirectory { path } | Self::CreateFile { path } | Self::Delete { path, .. } => {
                path.as_path()
            }
            Self::Rename { source, .. } | Self::Copy { source, .. } => source.as_path(),
            Self::Symlink { target, .. } => target.as_path(),
        }
    }

    /// The path written to, if different from [`FileOperation::path`].
    pub fn destination(&self) -> Option<&Path> {
        match self {
            Self::Rename { destination, .. } | Self::Copy { destination, .. } => {
                Some(destination.as_path())
            }
            Self::Symlink { link, .. } => Some(link.as_path()),
            _ => None,
        }
    }

    /// Human-readable failure message naming every path involved.
    pub fn failure_message(&self, reason: &str) -> String {
        match self {
            Self::CreateDirectory { path } | Self::CreateFile { path } => {
                format!("Could not create {}: {reason}", path.display())
            }
            Self::Rename {
                source,
                destination,
                ..
            } => format!(
                "Could not rename {} to {}: {reason}",
                source.display(),
                destination.display()
            ),
            Self::Copy {
                source,
                destination,
                ..
            } => format!(
                "Could not copy {} to {}: {reason}",
                source.display(),
                destination.display()
            ),
            Self::Delete { path, .. } => format!("Could not delete {}: {reason}", path.display()),
            Self::Symlink { target, link } => format!(
                "Could not create symbolic link {} pointing to {}: {reason}",
                link.display(),
                target.display()
            ),
        }
    }
}

/// A failed operation: classified kind plus the formatted message.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct OperationError {
    /// Classification used for conflict detection.
    pub kind: ErrorKind,
    /// The path acted on.
    pub path: PathBuf,
    /// The path written to, for two-path operations.
    pub destination: Option<PathBuf>,
    /// Human-readable message naming source and destination.
    pub message: String,
}

impl OperationError {
    /// Build an error for `operation` from an explicit kind and reason.
    pub fn new(operation: &FileOperation, kind: ErrorKind, reason: &str) -> Self {
        Self {
            kind,
            path: operation.path().to_path_buf(),
            destination: operation.destination().map(Path::to_path_buf),
            message: operation.failure_message(reason),
        }
    }

    /// Classify an I/O error raised by `operation`.
    pub fn from_io(operation: &FileOperation, error: &io::Error) -> Self {
        Self::new(operation, ErrorKind::from_io(error), &error.to_string())
    }

    /// Whether retrying with overwrite may succeed.
    pub fn is_conflict(&self) -> bool {
        self.kind.is_conflict()
    }
}

/// Result of one operation: success carries no value.
pub type OperationOutcome = Result<(), OperationError>;
