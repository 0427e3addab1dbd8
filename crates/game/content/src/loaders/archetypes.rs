//! Archetype loader.
//!
//! An archetype is an entity template identified by a stable class tag. Saves
//! store only the tag plus mutable fields, so the same templates must be
//! available again when a save is restored.

use std::path::Path;

use rpg_core::save::GROUND_ITEM_CLASS;
use rpg_core::{
    Ability, AbilityBook, Attributes, Brain, CharacterSheet, Entity, GameConfig, ResourcePool,
    Role,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{ItemCatalog, LoadResult, read_file};

/// Entity template as written in `archetypes.ron`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeSpec {
    pub tag: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub symbol: Option<char>,
    #[serde(default)]
    pub health: Option<u32>,
    #[serde(default)]
    pub defense: u32,
    #[serde(default)]
    pub attributes: Option<Attributes>,
    #[serde(default)]
    pub base_damage: Option<u32>,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub xp_value: u32,
    /// Enemies always think; other roles only when an aggro range is given.
    #[serde(default)]
    pub aggro_range: Option<f32>,
    #[serde(default)]
    pub character: Option<CharacterSpec>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub dialogue: Option<String>,
}

/// Character sheet template. Items are item catalog ids, abilities are
/// ability names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterSpec {
    #[serde(default)]
    pub abilities: Vec<String>,
    #[serde(default)]
    pub inventory: Vec<String>,
    #[serde(default)]
    pub weapon: Option<String>,
    #[serde(default)]
    pub armor: Option<String>,
    #[serde(default)]
    pub capacity: Option<usize>,
    /// Maximum mana; the sheet default when absent.
    #[serde(default)]
    pub mana: Option<u32>,
    #[serde(default)]
    pub stamina: Option<u32>,
}

impl ArchetypeSpec {
    /// A player archetype with a character sheet can lead a new game.
    pub fn is_playable(&self) -> bool {
        self.role == Role::Player && self.character.is_some()
    }

    /// Builds a fresh entity at the origin.
    pub fn instantiate(
        &self,
        items: &ItemCatalog,
        abilities: &[Ability],
        config: &GameConfig,
    ) -> LoadResult<Entity> {
        let mut builder = Entity::builder(self.name.clone(), self.role)
            .class(self.tag.clone())
            .defense(self.defense)
            .base_damage(self.base_damage.unwrap_or(config.unarmed_damage))
            .xp_value(self.xp_value);

        if let Some(symbol) = self.symbol {
            builder = builder.symbol(symbol);
        }
        if let Some(health) = self.health {
            builder = builder.health(health);
        }
        if let Some(attributes) = self.attributes {
            builder = builder.attributes(attributes);
        }
        if let Some(speed) = self.speed {
            builder = builder.speed(speed);
        }
        if self.role == Role::Enemy || self.aggro_range.is_some() {
            let range = self.aggro_range.unwrap_or(config.default_aggro_range);
            builder = builder.brain(Brain::new(range));
        }
        if let Some(description) = &self.description {
            builder = builder.description(description.clone());
        }
        if let Some(dialogue) = &self.dialogue {
            builder = builder.dialogue(dialogue.clone());
        }
        if let Some(spec) = &self.character {
            builder = builder.character(self.character_sheet(spec, items, abilities, config)?);
        }

        Ok(builder.build())
    }

    fn character_sheet(
        &self,
        spec: &CharacterSpec,
        items: &ItemCatalog,
        abilities: &[Ability],
        config: &GameConfig,
    ) -> LoadResult<CharacterSheet> {
        let learnable = spec
            .abilities
            .iter()
            .map(|name| {
                abilities
                    .iter()
                    .find(|a| a.is_named(name))
                    .cloned()
                    .ok_or_else(|| {
                        anyhow::anyhow!("Archetype '{}' lists unknown ability '{}'", self.tag, name)
                    })
            })
            .collect::<LoadResult<Vec<_>>>()?;

        let capacity = spec.capacity.unwrap_or(config.inventory_capacity);
        let mut sheet = CharacterSheet::new(config.experience.base_threshold, capacity)
            .with_abilities(AbilityBook::new(learnable));
        sheet.abilities.unlock_up_to(sheet.level);
        if let Some(mana) = spec.mana {
            sheet.mana = ResourcePool::new(mana as f32, sheet.mana.regen_per_second);
        }
        if let Some(stamina) = spec.stamina {
            sheet.stamina = ResourcePool::new(stamina as f32, sheet.stamina.regen_per_second);
        }

        for id in &spec.inventory {
            let item = items.instantiate(id)?;
            sheet
                .inventory
                .add(item)
                .map_err(|e| anyhow::anyhow!("Archetype '{}' inventory: {}", self.tag, e))?;
        }
        for id in spec.weapon.iter().chain(spec.armor.iter()) {
            let item = items.instantiate(id)?;
            sheet.equipment.equip(item).map_err(|item| {
                anyhow::anyhow!("Archetype '{}' cannot equip '{}'", self.tag, item.name)
            })?;
        }

        Ok(sheet)
    }
}

#[derive(Debug, Deserialize)]
struct ArchetypeFile {
    archetypes: Vec<ArchetypeSpec>,
}

/// Loader for archetype templates from RON files.
pub struct ArchetypeLoader;

impl ArchetypeLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ArchetypeSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ArchetypeSpec>> {
        let file: ArchetypeFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse archetypes RON: {}", e))?;

        let mut seen = std::collections::HashSet::new();
        for spec in &file.archetypes {
            if spec.tag == GROUND_ITEM_CLASS {
                anyhow::bail!("Archetype tag '{}' is reserved for ground items", spec.tag);
            }
            if !seen.insert(spec.tag.as_str()) {
                anyhow::bail!("Duplicate archetype tag '{}'", spec.tag);
            }
        }
        Ok(file.archetypes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::ItemLoader;
    use rpg_core::{AbilityEffect, Capabilities};

    const ITEMS: &str = r#"(
        items: {
            "valiant_sword": (
                name: "Valiant Sword",
                description: "A blade that shines with honor.",
                kind: Weapon(damage: 25, class: Melee),
            ),
            "health_potion": (
                name: "Health Potion",
                description: "",
                kind: Consumable((effect: Heal(20), quantity: 1)),
            ),
        },
    )"#;

    const ARCHETYPES: &str = r#"(
        archetypes: [
            (
                tag: "aeron",
                name: "Aeron",
                role: Player,
                health: Some(100),
                attributes: Some((strength: 15, dexterity: 12, intelligence: 10)),
                character: Some((
                    abilities: ["Shield Bash", "Skyfall"],
                    inventory: ["health_potion", "health_potion"],
                    weapon: Some("valiant_sword"),
                )),
            ),
            (
                tag: "goblin",
                name: "Goblin",
                role: Enemy,
                symbol: Some('g'),
                health: Some(30),
                xp_value: 40,
            ),
            (
                tag: "elder",
                name: "Elder",
                role: Npc,
                description: Some("A stooped old man."),
                dialogue: Some("elder_greeting"),
            ),
        ],
    )"#;

    fn abilities() -> Vec<Ability> {
        vec![
            Ability::new("Shield Bash", 10, 1, AbilityEffect::Damage(15)),
            Ability::new("Skyfall", 40, 5, AbilityEffect::Damage(60)),
        ]
    }

    #[test]
    fn player_archetype_builds_a_character() {
        let items = ItemLoader::parse(ITEMS).unwrap();
        let specs = ArchetypeLoader::parse(ARCHETYPES).unwrap();
        let aeron = specs[0]
            .instantiate(&items, &abilities(), &GameConfig::default())
            .unwrap();

        assert_eq!(aeron.class, "aeron");
        assert_eq!(aeron.symbol, '@');
        assert_eq!(aeron.attributes.strength, 15);
        assert_eq!(aeron.weapon_damage(), 25);
        assert!(aeron.brain.is_none());

        let sheet = aeron.character.as_ref().unwrap();
        assert_eq!(sheet.inventory.len(), 1);
        assert_eq!(sheet.inventory.find("health potion").unwrap().quantity(), 2);
        assert!(sheet.abilities.is_unlocked("Shield Bash"));
        assert!(!sheet.abilities.is_unlocked("Skyfall"));
    }

    #[test]
    fn character_pools_can_be_overridden() {
        let spec = r#"(archetypes: [(
            tag: "reverie",
            name: "Reverie",
            role: Player,
            character: Some((mana: Some(150))),
        )])"#;
        let specs = ArchetypeLoader::parse(spec).unwrap();
        assert!(specs[0].is_playable());

        let reverie = specs[0]
            .instantiate(&ItemCatalog::default(), &[], &GameConfig::default())
            .unwrap();
        let sheet = reverie.character.as_ref().unwrap();
        assert_eq!(sheet.mana.maximum, 150.0);
        assert_eq!(sheet.mana.current, 150.0);
        assert_eq!(sheet.stamina.maximum, CharacterSheet::DEFAULT_STAMINA);
    }

    #[test]
    fn enemies_get_a_brain_and_npcs_talk() {
        let items = ItemCatalog::default();
        let specs = ArchetypeLoader::parse(ARCHETYPES).unwrap();
        let config = GameConfig::default();

        let goblin = specs[1].instantiate(&items, &[], &config).unwrap();
        assert_eq!(goblin.brain.unwrap().aggro_range, config.default_aggro_range);
        assert_eq!(goblin.symbol, 'g');

        let elder = specs[2].instantiate(&items, &[], &config).unwrap();
        let caps = elder.capabilities();
        assert!(caps.contains(Capabilities::EXAMINABLE | Capabilities::TALKS));
        assert!(!caps.contains(Capabilities::HAS_AI));
    }

    #[test]
    fn unknown_item_reference_fails() {
        let specs = ArchetypeLoader::parse(ARCHETYPES).unwrap();
        let result = specs[0].instantiate(&ItemCatalog::default(), &abilities(), &GameConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn reserved_and_duplicate_tags_are_rejected() {
        let reserved = r#"(archetypes: [(tag: "item", name: "Crate", role: Prop)])"#;
        assert!(ArchetypeLoader::parse(reserved).is_err());

        let duplicate = r#"(archetypes: [
            (tag: "goblin", name: "Goblin", role: Enemy),
            (tag: "goblin", name: "Goblin Chief", role: Enemy),
        ])"#;
        assert!(ArchetypeLoader::parse(duplicate).is_err());
    }
}
