//! Errors raised while resolving a player command.
//!
//! A command that fails leaves the game state exactly as it was and does not
//! advance the world.

use crate::dialogue::DialogueError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{InventoryError, QuestError, ResourceKind};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    #[error("not enough {resource} for {ability} (needs {required}, has {available})")]
    InsufficientResource {
        ability: String,
        resource: ResourceKind,
        required: u32,
        available: u32,
    },

    #[error("inventory is full ({capacity} items)")]
    InventoryFull { capacity: usize },

    #[error("you have no '{0}'")]
    ItemNotFound(String),

    #[error("you can't use the {0}")]
    ItemNotUsable(String),

    #[error("the {0} can't be equipped")]
    NotEquippable(String),

    #[error("option {index} is not available ({available} options)")]
    InvalidDialogueOption { index: usize, available: usize },

    #[error("nobody is talking to you")]
    NoConversation,

    #[error("the {0} has nothing to say")]
    NothingToSay(String),

    #[error("there is no '{0}' here")]
    TargetNotFound(String),

    #[error("the {0} can't be attacked")]
    InvalidTarget(String),

    #[error("you don't know '{0}'")]
    UnknownAbility(String),

    #[error("the {0} blocks the way")]
    PathBlocked(String),

    #[error("you can't leave the area that way")]
    OutOfBounds,

    #[error("the {0} is out of reach")]
    OutOfReach(String),

    #[error("{0} has been defeated")]
    ActorDefeated(String),

    #[error("the acting character has no character sheet")]
    NotACharacter,

    #[error(transparent)]
    Quest(#[from] QuestError),

    #[error("dialogue content is broken: {0}")]
    BrokenDialogue(String),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        use ActionError::*;
        match self {
            InsufficientResource { .. } | InventoryFull { .. } | ItemNotUsable(_)
            | NotEquippable(_) | PathBlocked(_) | OutOfBounds | OutOfReach(_) => {
                ErrorSeverity::Recoverable
            }
            ItemNotFound(_) | InvalidDialogueOption { .. } | NoConversation
            | NothingToSay(_) | TargetNotFound(_) | InvalidTarget(_) | UnknownAbility(_) => {
                ErrorSeverity::Validation
            }
            Quest(err) => err.severity(),
            ActorDefeated(_) => ErrorSeverity::Fatal,
            NotACharacter | BrokenDialogue(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            InsufficientResource { .. } => "ACTION_INSUFFICIENT_RESOURCE",
            InventoryFull { .. } => "ACTION_INVENTORY_FULL",
            ItemNotFound(_) => "ACTION_ITEM_NOT_FOUND",
            ItemNotUsable(_) => "ACTION_ITEM_NOT_USABLE",
            NotEquippable(_) => "ACTION_NOT_EQUIPPABLE",
            InvalidDialogueOption { .. } => "ACTION_INVALID_DIALOGUE_OPTION",
            NoConversation => "ACTION_NO_CONVERSATION",
            NothingToSay(_) => "ACTION_NOTHING_TO_SAY",
            TargetNotFound(_) => "ACTION_TARGET_NOT_FOUND",
            InvalidTarget(_) => "ACTION_INVALID_TARGET",
            UnknownAbility(_) => "ACTION_UNKNOWN_ABILITY",
            PathBlocked(_) => "ACTION_PATH_BLOCKED",
            OutOfBounds => "ACTION_OUT_OF_BOUNDS",
            OutOfReach(_) => "ACTION_OUT_OF_REACH",
            ActorDefeated(_) => "ACTION_ACTOR_DEFEATED",
            NotACharacter => "ACTION_NOT_A_CHARACTER",
            Quest(_) => "ACTION_QUEST",
            BrokenDialogue(_) => "ACTION_BROKEN_DIALOGUE",
        }
    }
}

impl From<InventoryError> for ActionError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::Full { capacity } => ActionError::InventoryFull { capacity },
            InventoryError::NotFound(name) => ActionError::ItemNotFound(name),
            InventoryError::NotUsable(name) => ActionError::ItemNotUsable(name),
            InventoryError::NotEquippable(name) => ActionError::NotEquippable(name),
        }
    }
}

impl From<DialogueError> for ActionError {
    fn from(err: DialogueError) -> Self {
        match err {
            DialogueError::InvalidOption { index, available } => {
                ActionError::InvalidDialogueOption { index, available }
            }
            DialogueError::Finished => ActionError::NoConversation,
            DialogueError::MissingNode(node) => ActionError::BrokenDialogue(node),
        }
    }
}
