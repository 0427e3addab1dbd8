//! Error types raised by repository implementations.

use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("save repository lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("corrupted data: {0}")]
    CorruptedData(String),

    #[error("invalid save slot name '{0}'")]
    InvalidSlot(String),

    #[error("digest mismatch for slot '{slot}': expected {expected}, found {actual}")]
    DigestMismatch {
        slot: String,
        expected: String,
        actual: String,
    },
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
