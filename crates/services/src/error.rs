//! Shared error types for the services crate.

use thiserror::Error;

use revise_core::model::SessionStateError;
use storage::repository::StorageError;

use crate::sessions::SessionPhase;

/// Errors emitted by `SubsetSelector`.
///
/// Every variant is an invalid argument supplied by the caller; nothing has
/// been read or written when one is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    #[error("the value of N must be positive (got {0})")]
    NonPositiveDays(i64),
    #[error("the given value of N is too large: {requested} requested, {available} dates available")]
    TooManyDays { requested: i64, available: usize },
    #[error("a character is required to select words by first letter")]
    MissingCharacter,
}

/// Errors emitted by session services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("invalid choice: {0:?}")]
    InvalidChoice(String),
    #[error("session step not allowed while {0:?}")]
    OutOfOrder(SessionPhase),
    #[error("console error: {0}")]
    Console(#[from] std::io::Error),
    #[error(transparent)]
    State(#[from] SessionStateError),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
