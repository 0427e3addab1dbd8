//! Versioned save schema.
//!
//! [`SaveRecord`] lists every persisted field explicitly instead of dumping
//! the runtime types, so the on-disk format only changes when
//! [`SaveRecord::SCHEMA_VERSION`] does. Restoring goes through an
//! [`ArchetypeRegistry`]: each entity is rebuilt from the constructor
//! registered for its class tag, then overwritten with the saved values.
//! Content that is not saved (learnable abilities) comes from the archetype.
//!
//! The active conversation is not persisted.

use std::collections::HashMap;
use std::fmt;

use crate::ai::Brain;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    AbilityBook, Attributes, CharacterSheet, Entity, EntityFlags, EntityId, Equipment,
    GameOutcome, GameState, Inventory, InventoryError, Item, Position, Quest, QuestJournal,
    ResourceMeter, ResourcePool, Role, Scene, SpawnTrigger, StatusEffect, StatusEffects, Tick,
    TriggerCondition, TurnState,
};

/// Class tag of items lying on the ground.
pub const GROUND_ITEM_CLASS: &str = "item";

/// Builds a fresh entity for one archetype.
pub type ArchetypeFn = Box<dyn Fn() -> Entity + Send + Sync>;

/// Class tag → constructor, built by the content layer and injected where
/// saves are restored.
#[derive(Default)]
pub struct ArchetypeRegistry {
    constructors: HashMap<String, ArchetypeFn>,
}

impl ArchetypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        tag: impl Into<String>,
        constructor: impl Fn() -> Entity + Send + Sync + 'static,
    ) {
        self.constructors.insert(tag.into(), Box::new(constructor));
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.constructors.contains_key(tag)
    }

    pub fn build(&self, tag: &str) -> Option<Entity> {
        self.constructors.get(tag).map(|construct| construct())
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl fmt::Debug for ArchetypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.tags().collect();
        tags.sort_unstable();
        f.debug_struct("ArchetypeRegistry")
            .field("tags", &tags)
            .finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RestoreError {
    #[error("save schema version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("no archetype registered for class '{0}'")]
    UnknownArchetype(String),

    #[error("entity id {0} appears more than once")]
    DuplicateId(EntityId),

    #[error("player entity {0} is missing from the save")]
    MissingPlayer(EntityId),

    #[error("saved inventory does not fit: {0}")]
    Inventory(#[from] InventoryError),
}

impl GameError for RestoreError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            RestoreError::VersionMismatch { .. } => "RESTORE_VERSION_MISMATCH",
            RestoreError::UnknownArchetype(_) => "RESTORE_UNKNOWN_ARCHETYPE",
            RestoreError::DuplicateId(_) => "RESTORE_DUPLICATE_ID",
            RestoreError::MissingPlayer(_) => "RESTORE_MISSING_PLAYER",
            RestoreError::Inventory(_) => "RESTORE_INVENTORY",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaveRecord {
    pub version: u32,
    pub game_seed: u64,
    pub tick: u64,
    pub nonce: u64,
    pub elapsed: f32,
    pub outcome: GameOutcome,
    pub scene: SceneRecord,
    pub player: EntityId,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SceneRecord {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub next_id: u32,
    pub entities: Vec<EntityRecord>,
    pub triggers: Vec<TriggerRecord>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriggerRecord {
    pub condition: TriggerCondition,
    pub fired: bool,
    pub spawn: EntityRecord,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityRecord {
    pub id: EntityId,
    pub class: String,
    pub name: String,
    pub symbol: char,
    pub role: Role,
    pub x: f32,
    pub y: f32,
    pub health: u32,
    pub max_health: u32,
    pub defense: u32,
    pub strength: u32,
    pub dexterity: u32,
    pub intelligence: u32,
    pub base_damage: u32,
    pub speed: f32,
    pub xp_value: u32,
    /// In application order.
    pub status: Vec<StatusEffect>,
    pub flags: u8,
    pub character: Option<CharacterRecord>,
    pub brain: Option<Brain>,
    pub item: Option<Item>,
    pub description: Option<String>,
    pub dialogue: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterRecord {
    pub level: u32,
    pub experience: u32,
    pub next_level_at: u32,
    pub mana: ResourcePool,
    pub stamina: ResourcePool,
    pub unlocked_abilities: Vec<String>,
    pub inventory_capacity: usize,
    pub inventory: Vec<Item>,
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
    pub quests: Vec<Quest>,
}

impl SaveRecord {
    pub const SCHEMA_VERSION: u32 = 1;

    pub fn capture(state: &GameState) -> Self {
        let scene = &state.scene;
        Self {
            version: Self::SCHEMA_VERSION,
            game_seed: state.game_seed,
            tick: state.turn.tick.0,
            nonce: state.turn.nonce,
            elapsed: state.turn.elapsed,
            outcome: state.outcome,
            scene: SceneRecord {
                name: scene.name.clone(),
                width: scene.width,
                height: scene.height,
                next_id: scene.next_id(),
                entities: scene.iter().map(EntityRecord::capture).collect(),
                triggers: scene
                    .triggers
                    .iter()
                    .map(|t| TriggerRecord {
                        condition: t.condition,
                        fired: t.fired,
                        spawn: EntityRecord::capture(&t.spawn),
                    })
                    .collect(),
            },
            player: state.player,
        }
    }

    pub fn restore(&self, registry: &ArchetypeRegistry) -> Result<GameState, RestoreError> {
        if self.version != Self::SCHEMA_VERSION {
            return Err(RestoreError::VersionMismatch {
                found: self.version,
                expected: Self::SCHEMA_VERSION,
            });
        }

        let mut entities: Vec<Entity> = Vec::with_capacity(self.scene.entities.len());
        for record in &self.scene.entities {
            if entities.iter().any(|e| e.id == record.id) {
                return Err(RestoreError::DuplicateId(record.id));
            }
            entities.push(record.restore(registry)?);
        }
        if !entities.iter().any(|e| e.id == self.player) {
            return Err(RestoreError::MissingPlayer(self.player));
        }

        let triggers = self
            .scene
            .triggers
            .iter()
            .map(|t| {
                Ok(SpawnTrigger {
                    condition: t.condition,
                    spawn: Box::new(t.spawn.restore(registry)?),
                    fired: t.fired,
                })
            })
            .collect::<Result<Vec<_>, RestoreError>>()?;

        let scene = Scene::from_parts(
            self.scene.name.clone(),
            self.scene.width,
            self.scene.height,
            entities,
            self.scene.next_id,
            triggers,
        );
        Ok(GameState {
            game_seed: self.game_seed,
            turn: TurnState {
                tick: Tick(self.tick),
                nonce: self.nonce,
                elapsed: self.elapsed,
            },
            scene,
            player: self.player,
            conversation: None,
            outcome: self.outcome,
        })
    }
}

impl EntityRecord {
    pub fn capture(entity: &Entity) -> Self {
        Self {
            id: entity.id,
            class: entity.class.clone(),
            name: entity.name.clone(),
            symbol: entity.symbol,
            role: entity.role,
            x: entity.position.x,
            y: entity.position.y,
            health: entity.health.current,
            max_health: entity.health.maximum,
            defense: entity.defense,
            strength: entity.attributes.strength,
            dexterity: entity.attributes.dexterity,
            intelligence: entity.attributes.intelligence,
            base_damage: entity.base_damage,
            speed: entity.speed,
            xp_value: entity.xp_value,
            status: entity.status.iter().copied().collect(),
            flags: entity.flags.bits(),
            character: entity.character.as_deref().map(CharacterRecord::capture),
            brain: entity.brain,
            item: entity.item.clone(),
            description: entity.description.clone(),
            dialogue: entity.dialogue.clone(),
        }
    }

    /// Rebuilds the entity from its archetype. Ground items need no
    /// archetype; they are rebuilt from the saved item.
    pub fn restore(&self, registry: &ArchetypeRegistry) -> Result<Entity, RestoreError> {
        let position = Position::new(self.x, self.y);
        let mut entity = match (registry.build(&self.class), &self.item) {
            (Some(entity), _) => entity,
            (None, Some(item)) if self.class == GROUND_ITEM_CLASS => {
                Entity::ground_item(item.clone(), position)
            }
            (None, _) => return Err(RestoreError::UnknownArchetype(self.class.clone())),
        };

        entity.id = self.id;
        entity.class = self.class.clone();
        entity.name = self.name.clone();
        entity.symbol = self.symbol;
        entity.role = self.role;
        entity.position = position;
        entity.health = ResourceMeter::new(self.health, self.max_health);
        entity.defense = self.defense;
        entity.attributes = Attributes::new(self.strength, self.dexterity, self.intelligence);
        entity.base_damage = self.base_damage;
        entity.speed = self.speed;
        entity.xp_value = self.xp_value;
        entity.flags = EntityFlags::from_bits_truncate(self.flags);
        entity.brain = self.brain;
        entity.item = self.item.clone();
        entity.description = self.description.clone();
        entity.dialogue = self.dialogue.clone();

        let mut status = StatusEffects::empty();
        for effect in &self.status {
            status.apply(effect.kind, effect.remaining, effect.potency);
        }
        entity.status = status;

        entity.character = match &self.character {
            Some(record) => {
                let learnable = entity
                    .character
                    .as_ref()
                    .map(|sheet| sheet.abilities.learnable().to_vec())
                    .unwrap_or_default();
                Some(Box::new(record.restore(learnable)?))
            }
            None => None,
        };
        Ok(entity)
    }
}

impl CharacterRecord {
    pub fn capture(sheet: &CharacterSheet) -> Self {
        Self {
            level: sheet.level,
            experience: sheet.experience,
            next_level_at: sheet.next_level_at,
            mana: sheet.mana,
            stamina: sheet.stamina,
            unlocked_abilities: sheet.abilities.unlocked_names().to_vec(),
            inventory_capacity: sheet.inventory.capacity(),
            inventory: sheet.inventory.iter().cloned().collect(),
            weapon: sheet.equipment.weapon.clone(),
            armor: sheet.equipment.armor.clone(),
            quests: sheet.journal.iter().cloned().collect(),
        }
    }

    fn restore(
        &self,
        learnable: Vec<crate::state::Ability>,
    ) -> Result<CharacterSheet, RestoreError> {
        let mut abilities = AbilityBook::new(learnable);
        for name in &self.unlocked_abilities {
            abilities.force_unlock(name);
        }

        let mut inventory = Inventory::new(self.inventory_capacity);
        for item in &self.inventory {
            inventory.add(item.clone())?;
        }

        let mut journal = QuestJournal::default();
        for quest in &self.quests {
            journal.insert(quest.clone());
        }

        Ok(CharacterSheet {
            level: self.level,
            experience: self.experience,
            next_level_at: self.next_level_at,
            mana: self.mana,
            stamina: self.stamina,
            abilities,
            inventory,
            equipment: Equipment {
                weapon: self.weapon.clone(),
                armor: self.armor.clone(),
            },
            journal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiState;
    use crate::state::{
        Ability, AbilityEffect, ConsumableEffect, Objective, ObjectiveKind, StatusKind,
    };

    fn hero() -> Entity {
        let book = AbilityBook::new(vec![
            Ability::new("Fireball", 30, 1, AbilityEffect::Damage(25)),
            Ability::new("Heal", 20, 3, AbilityEffect::Heal(30)),
        ]);
        Entity::builder("Aeron", Role::Player)
            .class("hero")
            .character(CharacterSheet::default().with_abilities(book))
            .build()
    }

    fn troll() -> Entity {
        Entity::builder("Troll", Role::Enemy)
            .class("troll")
            .health(150)
            .defense(1)
            .brain(Brain::default())
            .build()
    }

    fn registry() -> ArchetypeRegistry {
        let mut registry = ArchetypeRegistry::new();
        registry.register("hero", hero);
        registry.register("troll", troll);
        registry
    }

    fn midgame() -> GameState {
        let mut scene = Scene::new("Cave", 40, 10);
        let mut player = hero();
        player.position = Position::new(4.0, 2.0);
        player.health.drain(35);
        player.status.apply(StatusKind::Poison, 2.0, 5.0);
        player.status.apply(StatusKind::Slow, 4.0, 0.0);
        {
            let sheet = player.character.as_mut().unwrap();
            sheet.level = 2;
            sheet.experience = 40;
            sheet.next_level_at = 150;
            sheet.mana.current = 62.5;
            sheet.abilities.unlock_up_to(1);
            sheet
                .inventory
                .add(Item::consumable("Potion", ConsumableEffect::Heal(20)).with_quantity(3))
                .unwrap();
            sheet.equipment.weapon = Some(Item::weapon("Sword", 5));
            sheet
                .journal
                .accept(
                    Quest::new("Troll Hunt", "Clear the cave")
                        .with_objective(Objective::new(ObjectiveKind::Defeat, "Troll", 1)),
                )
                .unwrap();
        }
        let player = scene.spawn(player);

        let mut enemy = troll();
        enemy.position = Position::new(7.25, 2.0);
        enemy.brain = Some(Brain {
            state: AiState::Chasing,
            aggro_range: 10.0,
        });
        scene.spawn(enemy);
        scene.spawn(Entity::ground_item(
            Item::armor("Leather", 2),
            Position::from_tile(9, 3),
        ));
        scene.triggers.push(SpawnTrigger::new(
            TriggerCondition::PlayerCrossesX(20.0),
            troll(),
        ));

        let mut state = GameState::new(scene, player, 42);
        state.turn = TurnState {
            tick: Tick(12),
            nonce: 15,
            elapsed: 12.0,
        };
        state
    }

    #[test]
    fn capture_restore_is_lossless() {
        let state = midgame();
        let record = SaveRecord::capture(&state);
        let restored = record.restore(&registry()).unwrap();

        assert_eq!(restored, state);
        assert_eq!(restored.scene.next_id(), state.scene.next_id());
        let sheet = restored.player().unwrap().character.as_ref().unwrap();
        assert!(sheet.abilities.is_unlocked("Fireball"));
        assert!(!sheet.abilities.is_unlocked("Heal"));
        assert_eq!(sheet.abilities.learnable().len(), 2);
    }

    #[test]
    fn unknown_class_is_rejected() {
        let record = SaveRecord::capture(&midgame());
        let mut partial = ArchetypeRegistry::new();
        partial.register("hero", hero);

        assert_eq!(
            record.restore(&partial).unwrap_err(),
            RestoreError::UnknownArchetype("troll".into())
        );
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let mut record = SaveRecord::capture(&midgame());
        record.version = 99;
        assert!(matches!(
            record.restore(&registry()),
            Err(RestoreError::VersionMismatch { found: 99, .. })
        ));
    }

    #[test]
    fn conversation_is_not_persisted() {
        let mut state = midgame();
        state.conversation = crate::dialogue::DialogueManager::new(
            crate::dialogue::DialogueTree::new("elder").node(
                "start",
                crate::dialogue::DialogueNode::new("Elder", "Hello."),
            ),
        )
        .ok();

        let restored = SaveRecord::capture(&state).restore(&registry()).unwrap();
        assert!(restored.conversation.is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn record_survives_json() {
        let record = SaveRecord::capture(&midgame());
        let json = serde_json::to_string(&record).unwrap();
        let decoded: SaveRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, record);
    }
}
