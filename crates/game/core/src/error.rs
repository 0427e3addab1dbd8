//! Shared error infrastructure for rpg-core.
//!
//! Domain errors (`ActionError`, `DialogueError`, `QuestError`, ...) live next
//! to the rules they guard. They all implement [`GameError`] so callers can
//! classify a failure without matching on every variant.

use crate::state::EntityId;

/// How a failure should be handled by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The command was rejected; the player may simply try something else.
    ///
    /// Examples: not enough mana, inventory full, path blocked.
    Recoverable,

    /// The command referenced something that does not exist or is malformed.
    ///
    /// Examples: unknown target name, dialogue option out of range.
    Validation,

    /// Rules and state disagree. Indicates a bug.
    Internal,

    /// The state cannot be used any further.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable | Self::Validation)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Diagnostic context captured where an error was raised.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Entity that issued the failing command.
    pub actor: Option<EntityId>,
    /// Command nonce at the time of failure.
    pub nonce: u64,
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(nonce: u64) -> Self {
        Self {
            actor: None,
            nonce,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: EntityId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common interface for every error raised by the rules.
///
/// Implementors derive `thiserror::Error` for `Display` and provide a stable
/// `error_code` for logs and tests.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
