//! Event payloads for the runtime topics.

use rpg_core::{GameEvent, GameOutcome};
use serde::{Deserialize, Serialize};

/// A fact produced by the engine, stamped with the turn it happened in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnEvent {
    /// Tick at the start of the command that produced the event.
    pub tick: u64,
    /// Nonce of the command that produced the event.
    pub nonce: u64,
    pub event: GameEvent,
}

/// Runtime-level notices that do not come from the rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// A command was rejected; nothing changed.
    CommandRejected { intent: String, error: String },
    Saved { slot: String, digest: String },
    Loaded { slot: String },
    GameOver { outcome: GameOutcome },
}
