pub mod abilities;
pub mod character;
pub mod common;
pub mod entity;
pub mod equipment;
pub mod inventory;
pub mod item;
pub mod quest;
pub mod scene;
pub mod status;

pub use abilities::{Ability, AbilityBook, AbilityEffect, ResourceKind};
pub use character::{CharacterSheet, ResourcePool};
pub use common::{Direction, EntityId, Position, ResourceMeter, Tick};
pub use entity::{Attributes, Capabilities, Entity, EntityBuilder, EntityFlags, Role};
pub use equipment::{Equipment, EquipmentBuilder};
pub use inventory::{AddOutcome, Inventory, InventoryError};
pub use item::{Consumable, ConsumableEffect, Item, ItemKind, WeaponClass};
pub use quest::{Objective, ObjectiveKind, Quest, QuestError, QuestJournal, QuestStatus};
pub use scene::{Scene, SpawnTrigger, TriggerCondition};
pub use status::{
    MAX_STATUS_EFFECTS, PeriodicDamage, StatusEffect, StatusEffects, StatusKind, StatusTick,
};
