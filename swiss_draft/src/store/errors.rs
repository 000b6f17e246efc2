//! Storage error types.

use thiserror::Error;

use crate::swiss::TournamentId;

/// Repository errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    /// A thread panicked while holding the store lock
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Result type for repository operations
pub type StoreResult<T> = Result<T, StoreError>;
