//! Player-specific error types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    #[error("tab not found: {0}")]
    InvalidTabId(String),

    #[error("tab set is empty")]
    EmptyTabSet,

    #[error("duplicate tab id: {0}")]
    DuplicateTabId(String),

    #[error("controller has been disposed")]
    Disposed,
}

pub type PlayerResult<T> = Result<T, PlayerError>;
