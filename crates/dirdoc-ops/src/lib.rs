//! File operations engine for dirdoc.
//!
//! This crate wraps the individual filesystem mutations dirdoc performs
//! (create, rename, copy, delete, symlink) behind one executor that turns
//! every outcome into a success or a classified [`OperationError`].
//! Batches run concurrently and come back as a [`BatchReport`] whose
//! results line up with the submitted operations.

mod conflict;
mod copy;
mod create;
mod delete;
mod executor;
mod operation;
mod paths;
mod rename;
mod report;
mod symlink;

pub use conflict::{Conflict, ConflictResolution};
pub use executor::OperationExecutor;
pub use operation::{FileOperation, OperationError, OperationOutcome, OperationType};
pub use report::BatchReport;
