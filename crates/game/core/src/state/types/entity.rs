//! Scene entities.
//!
//! Every object in a scene is an [`Entity`]. What an entity can do is decided
//! by the optional components it carries rather than by its role: a
//! [`CharacterSheet`] gives it an inventory and resource pools, a [`Brain`]
//! makes the AI drive it, a ground [`Item`] makes it collectible. The
//! [`Capabilities`] flags summarize those components for quick checks.

use bitflags::bitflags;

use super::character::CharacterSheet;
use super::common::{EntityId, Position, ResourceMeter};
use super::item::Item;
use super::status::{StatusEffects, StatusKind};
use crate::ai::Brain;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Role {
    Player,
    Enemy,
    Npc,
    Item,
    Prop,
}

bitflags! {
    /// Presence flags of an entity in its scene.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct EntityFlags: u8 {
        const VISIBLE = 1 << 0;
        const SOLID = 1 << 1;
        const DEFEATED = 1 << 2;
    }
}

impl Default for EntityFlags {
    fn default() -> Self {
        EntityFlags::VISIBLE | EntityFlags::SOLID
    }
}

bitflags! {
    /// Derived from the components an entity carries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        const HAS_INVENTORY = 1 << 0;
        const HAS_RESOURCE_POOL = 1 << 1;
        const HAS_AI = 1 << 2;
        const PICKUP = 1 << 3;
        const EXAMINABLE = 1 << 4;
        const TALKS = 1 << 5;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    pub strength: u32,
    pub dexterity: u32,
    pub intelligence: u32,
}

impl Attributes {
    pub const fn new(strength: u32, dexterity: u32, intelligence: u32) -> Self {
        Self {
            strength,
            dexterity,
            intelligence,
        }
    }

    pub fn grow(&mut self, amount: u32) {
        self.strength = self.strength.saturating_add(amount);
        self.dexterity = self.dexterity.saturating_add(amount);
        self.intelligence = self.intelligence.saturating_add(amount);
    }
}

impl Default for Attributes {
    fn default() -> Self {
        Self::new(10, 10, 10)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub symbol: char,
    /// Stable archetype tag used to rebuild the entity from a save.
    pub class: String,
    pub role: Role,
    pub position: Position,
    pub health: ResourceMeter,
    pub defense: u32,
    pub attributes: Attributes,
    /// Damage dealt without a weapon.
    pub base_damage: u32,
    /// Tiles per second when moved by the AI.
    pub speed: f32,
    /// Experience awarded to whoever defeats this entity.
    pub xp_value: u32,
    pub status: StatusEffects,
    pub flags: EntityFlags,
    pub character: Option<Box<CharacterSheet>>,
    pub brain: Option<Brain>,
    /// Present when the entity is an item lying on the ground.
    pub item: Option<Item>,
    pub description: Option<String>,
    /// Dialogue tree started by talking to this entity.
    pub dialogue: Option<String>,
}

impl Entity {
    pub fn builder(name: impl Into<String>, role: Role) -> EntityBuilder {
        EntityBuilder::new(name, role)
    }

    /// A visible, non-solid pickup lying at `position`.
    pub fn ground_item(item: Item, position: Position) -> Entity {
        let description = (!item.description.is_empty()).then(|| item.description.clone());
        let mut entity = Entity::builder(item.name.clone(), Role::Item)
            .class("item")
            .symbol('*')
            .at(position)
            .health(0)
            .build();
        entity.flags = EntityFlags::VISIBLE;
        entity.description = description;
        entity.item = Some(item);
        entity
    }

    pub fn capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        if self.character.is_some() {
            caps |= Capabilities::HAS_INVENTORY | Capabilities::HAS_RESOURCE_POOL;
        }
        caps.set(Capabilities::HAS_AI, self.brain.is_some());
        caps.set(Capabilities::PICKUP, self.item.is_some());
        caps.set(Capabilities::EXAMINABLE, self.description.is_some());
        caps.set(Capabilities::TALKS, self.dialogue.is_some());
        caps
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    pub fn is_visible(&self) -> bool {
        self.flags.contains(EntityFlags::VISIBLE)
    }

    pub fn is_solid(&self) -> bool {
        self.flags.contains(EntityFlags::SOLID)
    }

    pub fn is_defeated(&self) -> bool {
        self.flags.contains(EntityFlags::DEFEATED)
    }

    /// Takes part in combat and world updates.
    pub fn is_active_combatant(&self) -> bool {
        !self.is_defeated() && self.health.maximum > 0 && self.item.is_none()
    }

    pub fn is_hostile(&self) -> bool {
        self.role == Role::Enemy && !self.is_defeated()
    }

    /// Defense including equipped armor, before armor break.
    pub fn effective_defense(&self) -> u32 {
        let armor = self
            .character
            .as_ref()
            .map(|c| c.equipment.armor_defense())
            .unwrap_or(0);
        self.defense.saturating_add(armor)
    }

    /// Defense actually applied to an incoming hit.
    pub fn mitigation(&self) -> u32 {
        if self.status.has(StatusKind::ArmorBreak) {
            0
        } else {
            self.effective_defense()
        }
    }

    /// Weapon damage when armed, otherwise the natural damage.
    pub fn weapon_damage(&self) -> u32 {
        self.character
            .as_ref()
            .and_then(|c| c.equipment.weapon_damage())
            .unwrap_or(self.base_damage)
    }

    /// Marks the entity defeated and removes it from play.
    pub fn mark_defeated(&mut self) {
        self.flags.remove(EntityFlags::VISIBLE | EntityFlags::SOLID);
        self.flags.insert(EntityFlags::DEFEATED);
        self.status.clear();
    }

    pub fn level(&self) -> Option<u32> {
        self.character.as_ref().map(|c| c.level)
    }
}

pub struct EntityBuilder {
    entity: Entity,
}

impl EntityBuilder {
    pub fn new(name: impl Into<String>, role: Role) -> Self {
        let symbol = match role {
            Role::Player => '@',
            Role::Enemy => 'E',
            Role::Npc => 'N',
            Role::Item => '*',
            Role::Prop => '#',
        };
        Self {
            entity: Entity {
                id: EntityId::default(),
                name: name.into(),
                symbol,
                class: role.as_ref().to_string(),
                role,
                position: Position::ORIGIN,
                health: match role {
                    Role::Item | Role::Prop => ResourceMeter::full(0),
                    _ => ResourceMeter::full(100),
                },
                defense: 0,
                attributes: Attributes::default(),
                base_damage: crate::config::GameConfig::DEFAULT_UNARMED_DAMAGE,
                speed: 2.0,
                xp_value: 0,
                status: StatusEffects::empty(),
                flags: EntityFlags::default(),
                character: None,
                brain: None,
                item: None,
                description: None,
                dialogue: None,
            },
        }
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.entity.class = class.into();
        self
    }

    pub fn symbol(mut self, symbol: char) -> Self {
        self.entity.symbol = symbol;
        self
    }

    pub fn at(mut self, position: Position) -> Self {
        self.entity.position = position;
        self
    }

    pub fn health(mut self, maximum: u32) -> Self {
        self.entity.health = ResourceMeter::full(maximum);
        self
    }

    pub fn defense(mut self, defense: u32) -> Self {
        self.entity.defense = defense;
        self
    }

    pub fn attributes(mut self, attributes: Attributes) -> Self {
        self.entity.attributes = attributes;
        self
    }

    pub fn base_damage(mut self, damage: u32) -> Self {
        self.entity.base_damage = damage;
        self
    }

    pub fn speed(mut self, speed: f32) -> Self {
        self.entity.speed = speed;
        self
    }

    pub fn xp_value(mut self, xp: u32) -> Self {
        self.entity.xp_value = xp;
        self
    }

    pub fn character(mut self, sheet: CharacterSheet) -> Self {
        self.entity.character = Some(Box::new(sheet));
        self
    }

    pub fn brain(mut self, brain: Brain) -> Self {
        self.entity.brain = Some(brain);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.entity.description = Some(description.into());
        self
    }

    pub fn dialogue(mut self, dialogue: impl Into<String>) -> Self {
        self.entity.dialogue = Some(dialogue.into());
        self
    }

    pub fn flags(mut self, flags: EntityFlags) -> Self {
        self.entity.flags = flags;
        self
    }

    pub fn build(self) -> Entity {
        self.entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::types::item::Item;

    #[test]
    fn capabilities_follow_components() {
        let statue = Entity::builder("Ancient Statue", Role::Prop)
            .description("Weathered stone.")
            .build();
        assert_eq!(statue.capabilities(), Capabilities::EXAMINABLE);

        let hero = Entity::builder("Aeron", Role::Player)
            .character(CharacterSheet::default())
            .build();
        assert!(hero.capabilities().contains(Capabilities::HAS_INVENTORY));
        assert!(!hero.capabilities().contains(Capabilities::HAS_AI));

        let dart = Entity::ground_item(Item::weapon("Dagger", 4), Position::ORIGIN);
        assert!(dart.capabilities().contains(Capabilities::PICKUP));
        assert!(!dart.is_solid());
    }

    #[test]
    fn armor_break_ignores_worn_armor() {
        let mut sheet = CharacterSheet::default();
        sheet.equipment.armor = Some(Item::armor("Plate", 15));
        let mut knight = Entity::builder("Knight", Role::Player)
            .defense(5)
            .character(sheet)
            .build();

        assert_eq!(knight.mitigation(), 20);
        knight.status.apply(StatusKind::ArmorBreak, 10.0, 0.0);
        assert_eq!(knight.mitigation(), 0);
    }

    #[test]
    fn defeat_hides_entity() {
        let mut troll = Entity::builder("Troll", Role::Enemy).build();
        troll.mark_defeated();
        assert!(!troll.is_visible());
        assert!(!troll.is_solid());
        assert!(!troll.is_active_combatant());
    }
}
