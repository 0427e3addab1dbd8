//! Facts produced while resolving a turn.
//!
//! Events are emitted in the order they happened. The runtime turns them into
//! message-log lines and publishes them to subscribers; the core never
//! formats text for display.

use crate::ai::AiState;
use crate::state::{EntityId, Position, StatusKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventCategory {
    Combat,
    World,
    Progression,
    Dialogue,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameEvent {
    Moved {
        entity: EntityId,
        to: Position,
    },
    AttackEvaded {
        attacker: EntityId,
        defender: EntityId,
    },
    AttackMissed {
        attacker: EntityId,
        defender: EntityId,
    },
    AttackHit {
        attacker: EntityId,
        defender: EntityId,
        damage: u32,
        critical: bool,
    },
    StatusDamage {
        entity: EntityId,
        kind: StatusKind,
        damage: u32,
    },
    Healed {
        entity: EntityId,
        amount: u32,
    },
    ManaRestored {
        entity: EntityId,
        amount: u32,
    },
    Defeated {
        entity: EntityId,
        by: Option<EntityId>,
    },
    StatusApplied {
        entity: EntityId,
        kind: StatusKind,
        duration: f32,
    },
    StatusExpired {
        entity: EntityId,
        kind: StatusKind,
    },
    /// The entity lost its action to stun or sleep.
    Incapacitated {
        entity: EntityId,
    },
    AiStateChanged {
        entity: EntityId,
        from: AiState,
        to: AiState,
    },
    AbilityCast {
        caster: EntityId,
        ability: String,
        target: EntityId,
    },
    ItemPickedUp {
        entity: EntityId,
        item: String,
        quantity: u32,
    },
    ItemUsed {
        entity: EntityId,
        item: String,
        target: EntityId,
    },
    ItemEquipped {
        entity: EntityId,
        item: String,
        replaced: Option<String>,
    },
    ItemDropped {
        entity: EntityId,
        item: String,
    },
    Examined {
        target: EntityId,
        description: String,
    },
    ExperienceGained {
        entity: EntityId,
        amount: u32,
    },
    LeveledUp {
        entity: EntityId,
        level: u32,
    },
    AbilityUnlocked {
        entity: EntityId,
        ability: String,
    },
    QuestProgressed {
        quest: String,
    },
    QuestCompleted {
        quest: String,
        reward: u32,
    },
    ConversationStarted {
        with: EntityId,
    },
    DialogueLine {
        speaker: String,
        text: String,
        options: Vec<String>,
    },
    ConversationEnded,
    EntitySpawned {
        entity: EntityId,
    },
    Waited {
        entity: EntityId,
    },
}

impl GameEvent {
    pub fn category(&self) -> EventCategory {
        use GameEvent::*;
        match self {
            AttackEvaded { .. }
            | AttackMissed { .. }
            | AttackHit { .. }
            | StatusDamage { .. }
            | Healed { .. }
            | Defeated { .. }
            | StatusApplied { .. }
            | StatusExpired { .. }
            | Incapacitated { .. }
            | AbilityCast { .. } => EventCategory::Combat,
            ExperienceGained { .. }
            | LeveledUp { .. }
            | AbilityUnlocked { .. }
            | QuestProgressed { .. }
            | QuestCompleted { .. } => EventCategory::Progression,
            ConversationStarted { .. } | DialogueLine { .. } | ConversationEnded => {
                EventCategory::Dialogue
            }
            Moved { .. }
            | ManaRestored { .. }
            | AiStateChanged { .. }
            | ItemPickedUp { .. }
            | ItemUsed { .. }
            | ItemEquipped { .. }
            | ItemDropped { .. }
            | Examined { .. }
            | EntitySpawned { .. }
            | Waited { .. } => EventCategory::World,
        }
    }
}
