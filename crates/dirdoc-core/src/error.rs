//! Error types shared by every dirdoc crate.

use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validate::NameError;

/// Result alias using [`DirdocError`].
pub type Result<T, E = DirdocError> = std::result::Result<T, E>;

/// Errors surfaced by dirdoc actions.
#[derive(Debug, Error)]
pub enum DirdocError {
    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// The destination already exists.
    #[error("Target already exists: {path}")]
    AlreadyExists { path: PathBuf },

    /// A directory was expected.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// A name typed by the user failed validation.
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: NameError },

    /// A line of a batch name list failed validation (1-based line number).
    #[error("Invalid value at line {line}: {reason}")]
    InvalidLine { line: usize, reason: NameError },

    /// The edited name list does not have one line per selected entry.
    #[error("The line count does not match the file selection (expected {expected}, found {actual})")]
    LineCountMismatch { expected: usize, actual: usize },

    /// Two lines of a name list resolve to the same name.
    #[error("Duplicated file names: {name}")]
    DuplicateTargetNames { name: String },

    /// A batch session is already open.
    #[error("Batch already exists. Please save or cancel it first.")]
    SessionBusy,

    /// The directory has no cache entry anymore.
    #[error("The cache for {path} has been deleted. Please refresh the view.")]
    CacheMiss { path: PathBuf },

    /// Paste requested without a pending operation.
    #[error("There is no pending operation")]
    NothingPending,

    /// Paste requested into the directory the entries came from.
    #[error("Same parent: {path}")]
    SameParent { path: PathBuf },

    /// The action needs at least one selected entry.
    #[error("No entry is selected")]
    NoSelection,

    /// Merge copy requested where the platform cannot do it.
    #[error("Merging folders is not supported on this platform")]
    MergeUnsupported,

    /// A path could not be resolved through its symlinks.
    #[error("Could not resolve {path}: {source}")]
    Resolve {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Unclassified error, message preserved for logging.
    #[error("I/O error at {path}: {message}")]
    Unknown { path: PathBuf, message: String },
}

impl DirdocError {
    /// Create an error from an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match ErrorKind::from_io(&source) {
            ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            ErrorKind::NotFound => Self::NotFound { path },
            ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            ErrorKind::NotADirectory => Self::NotADirectory { path },
            _ => Self::Unknown {
                path,
                message: source.to_string(),
            },
        }
    }

    /// Flat classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::NotADirectory { .. } => ErrorKind::NotADirectory,
            Self::InvalidName { .. } | Self::InvalidLine { .. } => ErrorKind::InvalidName,
            Self::LineCountMismatch { .. } => ErrorKind::LineCountMismatch,
            Self::DuplicateTargetNames { .. } => ErrorKind::DuplicateTargetNames,
            Self::SessionBusy => ErrorKind::SessionBusy,
            Self::CacheMiss { .. } => ErrorKind::CacheMiss,
            Self::NothingPending => ErrorKind::NothingPending,
            Self::SameParent { .. } => ErrorKind::SameParent,
            Self::NoSelection => ErrorKind::NoSelection,
            Self::MergeUnsupported => ErrorKind::Unsupported,
            Self::Resolve { source, .. } => ErrorKind::from_io(source),
            Self::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    /// Whether the user can fix this by refreshing or editing input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::CacheMiss
                | ErrorKind::InvalidName
                | ErrorKind::LineCountMismatch
                | ErrorKind::DuplicateTargetNames
        )
    }
}

/// Classification of a failure, independent of its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    PermissionDenied,
    /// The only conflict-eligible kind.
    AlreadyExists,
    NotADirectory,
    InvalidName,
    LineCountMismatch,
    DuplicateTargetNames,
    SessionBusy,
    CacheMiss,
    NothingPending,
    SameParent,
    NoSelection,
    /// The destination lies inside the source directory.
    SourceIsAncestor,
    Unsupported,
    Unknown,
}

impl ErrorKind {
    /// Classify a raw I/O error.
    pub fn from_io(error: &io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::AlreadyExists => Self::AlreadyExists,
            io::ErrorKind::NotADirectory => Self::NotADirectory,
            io::ErrorKind::Unsupported => Self::Unsupported,
            _ => Self::Unknown,
        }
    }

    /// Whether an operation failing with this kind may be retried with overwrite.
    pub fn is_conflict(self) -> bool {
        self == Self::AlreadyExists
    }
}
