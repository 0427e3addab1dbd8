//! Deterministic rules of the RPG: entities, combat, status effects, enemy AI,
//! inventory, progression, quests and dialogue.
//!
//! `rpg-core` performs no I/O. Content, persistence and presentation live in
//! the crates that depend on it. All state mutation flows through
//! [`engine::GameEngine`]; everything else is either pure data or a pure
//! function over it, re-exported here for convenience.
pub mod action;
pub mod ai;
pub mod combat;
pub mod config;
pub mod dialogue;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod progression;
pub mod save;
pub mod state;

pub use action::{ActionError, Intent};
pub use ai::{AiDecision, AiState, Brain};
pub use combat::{AttackOutcome, AttackRolls, DamageReport};
pub use config::{ExperienceCurve, GameConfig};
pub use dialogue::{DialogueError, DialogueManager, DialogueNode, DialogueOption, DialogueTree};
pub use engine::{ExecuteError, GameEngine, TurnOutcome};
pub use env::{DialogueOracle, FixedRng, GameEnv, NoDialogue, PcgRng, RngOracle};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use events::{EventCategory, GameEvent};
pub use progression::{LevelReport, gain_experience};
pub use save::{ArchetypeRegistry, RestoreError, SaveRecord};
pub use state::{
    Ability, AbilityBook, AbilityEffect, Attributes, Capabilities, CharacterSheet,
    ConsumableEffect, Direction, Entity, EntityFlags, EntityId, Equipment, GameOutcome, GameState,
    Inventory, Item, ItemKind, Objective, ObjectiveKind, Position, Quest, QuestJournal,
    QuestStatus, ResourceKind, ResourceMeter, ResourcePool, Role, Scene, SpawnTrigger,
    StatusEffects, StatusKind, Tick, TriggerCondition, TurnState,
};
