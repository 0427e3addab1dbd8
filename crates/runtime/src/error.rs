//! Unified error type surfaced by the runtime API.
//!
//! Wraps engine, repository and restore failures so clients can bubble them
//! up with consistent context.
use thiserror::Error;

use rpg_core::{ExecuteError, RestoreError};

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Execute(#[from] ExecuteError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("failed to restore save: {0}")]
    Restore(#[from] RestoreError),

    #[error("no save in slot '{0}'")]
    SlotNotFound(String),

    #[error("runtime requires an initial game state before building")]
    MissingState,

    #[error("failed to prepare content: {0}")]
    Content(String),
}

impl RuntimeError {
    /// The command was rejected by the rules and nothing changed.
    pub fn is_rejected_command(&self) -> bool {
        matches!(self, RuntimeError::Execute(ExecuteError::Action { .. }))
    }
}
