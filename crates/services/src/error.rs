//! Shared error types for the services crate.

use thiserror::Error;

use review_core::model::{NoteValidationError, QuestionId};
use storage::StorageError;

/// Errors emitted by `ErrorLogService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorLogError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ReviewFlowService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReviewFlowError {
    #[error("record {0} is not in the mistake log")]
    UnknownRecord(QuestionId),
}

/// Errors surfaced inside a review session via `last_error`.
///
/// Both variants are recovered locally: validation errors never reach a
/// repository, persistence errors roll the session back. Neither is fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("note text is required")]
    NoteRequired,

    #[error("failed to persist review change: {0}")]
    Persistence(String),
}

impl From<NoteValidationError> for SessionError {
    fn from(_: NoteValidationError) -> Self {
        SessionError::NoteRequired
    }
}
