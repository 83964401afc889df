//! Ordered results of a batch of operations.

use tracing::error;

use crate::{FileOperation, OperationError, OperationOutcome};

/// Every submitted operation paired with its outcome, in submission order.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    entries: Vec<(FileOperation, OperationOutcome)>,
}

impl BatchReport {
    /// Pair operations with outcomes. Both must be in submission order.
    pub fn new(operations: Vec<FileOperation>, outcomes: Vec<OperationOutcome>) -> Self {
        debug_assert_eq!(operations.len(), outcomes.len());
        Self {
            entries: operations.into_iter().zip(outcomes).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of operations that succeeded.
    pub fn succeeded(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.is_ok()).count()
    }

    /// Number of operations that failed.
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Iterate over operations and their outcomes.
    pub fn outcomes(&self) -> impl Iterator<Item = (&FileOperation, &OperationOutcome)> {
        self.entries.iter().map(|(op, result)| (op, result))
    }

    /// Iterate over failures only.
    pub fn errors(&self) -> impl Iterator<Item = &OperationError> {
        self.entries.iter().filter_map(|(_, r)| r.as_ref().err())
    }

    pub fn first_error(&self) -> Option<&OperationError> {
        self.errors().next()
    }

    /// Operations that failed because the destination was occupied, with
    /// their submission index.
    pub fn conflicts(&self) -> impl Iterator<Item = (usize, &FileOperation)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, (_, r))| r.as_ref().is_err_and(OperationError::is_conflict))
            .map(|(i, (op, _))| (i, op))
    }

    /// Log every failure.
    pub fn log_errors(&self) {
        for err in self.errors() {
            error!(kind = ?err.kind, "{}", err.message);
        }
    }

    /// Log every failure and return the first message for the user.
    pub fn surface(&self) -> Option<String> {
        self.log_errors();
        self.first_error().map(|err| err.message.clone())
    }
}
