//! Errors surfaced by [`super::GameEngine`].

use crate::action::ActionError;
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::GameOutcome;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecuteError {
    /// The command was rejected; the state is unchanged.
    #[error("{intent} failed: {source}")]
    Action {
        intent: &'static str,
        source: ActionError,
        context: ErrorContext,
    },

    #[error("the game is over ({0})")]
    GameOver(GameOutcome),
}

impl ExecuteError {
    pub fn action(intent: &'static str, source: ActionError, context: ErrorContext) -> Self {
        Self::Action {
            intent,
            source,
            context,
        }
    }

    pub fn action_error(&self) -> Option<&ActionError> {
        match self {
            ExecuteError::Action { source, .. } => Some(source),
            ExecuteError::GameOver(_) => None,
        }
    }
}

impl GameError for ExecuteError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            ExecuteError::Action { source, .. } => source.severity(),
            ExecuteError::GameOver(_) => ErrorSeverity::Fatal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            ExecuteError::Action { context, .. } => Some(context),
            ExecuteError::GameOver(_) => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ExecuteError::Action { source, .. } => source.error_code(),
            ExecuteError::GameOver(_) => "ENGINE_GAME_OVER",
        }
    }
}
