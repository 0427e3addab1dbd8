//! Content factory for building game state and archetype registries from
//! data files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rpg_core::{
    Ability, ArchetypeRegistry, DialogueTree, Entity, EntityId, GameConfig, GameEngine, GameState,
    Position, Scene, SpawnTrigger,
};
use tracing::{debug, info};

use crate::loaders::{
    AbilityLoader, ArchetypeLoader, ArchetypeSpec, ConfigLoader, DialogueLoader, ItemCatalog,
    ItemLoader, LoadResult, Placement, SceneLoader, SceneSpec,
};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── items.ron
/// ├── abilities.ron
/// ├── archetypes.ron
/// ├── dialogue.ron
/// └── scenes/
///     ├── aethelgard.ron
///     └── monolith_clearing.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const SCENE_DIR: &'static str = "scenes";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, falling back to the
    /// defaults when the file does not exist.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(GameConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<ItemCatalog> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load ability definitions from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<Vec<Ability>> {
        AbilityLoader::load(&self.data_dir.join("abilities.ron"))
    }

    /// Load archetype templates from `archetypes.ron`.
    pub fn load_archetypes(&self) -> LoadResult<Vec<ArchetypeSpec>> {
        ArchetypeLoader::load(&self.data_dir.join("archetypes.ron"))
    }

    /// Load dialogue trees from `dialogue.ron`. A missing file means no
    /// dialogue.
    pub fn load_dialogues(&self) -> LoadResult<Vec<DialogueTree>> {
        let path = self.data_dir.join("dialogue.ron");
        if !path.exists() {
            return Ok(Vec::new());
        }
        DialogueLoader::load(&path)
    }

    /// Load a scene from `scenes/{scene_name}.ron`.
    pub fn load_scene(&self, scene_name: &str) -> LoadResult<SceneSpec> {
        let path = self
            .data_dir
            .join(Self::SCENE_DIR)
            .join(format!("{}.ron", scene_name));
        SceneLoader::load(&path)
    }

    /// Names of the scene files available, sorted.
    pub fn list_scenes(&self) -> LoadResult<Vec<String>> {
        let dir = self.data_dir.join(Self::SCENE_DIR);
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to read scene directory {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "ron") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Loads every catalog and cross-checks the archetypes against items and
    /// abilities.
    pub fn load_catalog(&self) -> LoadResult<ContentCatalog> {
        let catalog = ContentCatalog {
            config: self.load_config()?,
            items: self.load_items()?,
            abilities: self.load_abilities()?,
            archetypes: self.load_archetypes()?,
            dialogues: self.load_dialogues()?,
        };
        for spec in &catalog.archetypes {
            spec.instantiate(&catalog.items, &catalog.abilities, &catalog.config)?;
        }
        info!(
            data_dir = %self.data_dir.display(),
            items = catalog.items.len(),
            abilities = catalog.abilities.len(),
            archetypes = catalog.archetypes.len(),
            dialogues = catalog.dialogues.len(),
            "content loaded"
        );
        Ok(catalog)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Every catalog of one data directory.
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    pub config: GameConfig,
    pub items: ItemCatalog,
    pub abilities: Vec<Ability>,
    pub archetypes: Vec<ArchetypeSpec>,
    pub dialogues: Vec<DialogueTree>,
}

/// A freshly set up game.
#[derive(Debug, Clone)]
pub struct NewGame {
    pub state: GameState,
    /// Lines for the message log before the first command.
    pub intro: Vec<String>,
}

impl ContentCatalog {
    pub fn archetype(&self, tag: &str) -> Option<&ArchetypeSpec> {
        self.archetypes.iter().find(|a| a.tag == tag)
    }

    /// Builds a fresh entity from archetype `tag`.
    pub fn instantiate(&self, tag: &str) -> LoadResult<Entity> {
        let spec = self
            .archetype(tag)
            .ok_or_else(|| anyhow::anyhow!("Unknown archetype '{}'", tag))?;
        spec.instantiate(&self.items, &self.abilities, &self.config)
    }

    /// Archetypes that can lead a new game.
    pub fn playable(&self) -> impl Iterator<Item = &ArchetypeSpec> {
        self.archetypes.iter().filter(|a| a.is_playable())
    }

    /// Registry rebuilding every archetype by tag.
    ///
    /// Templates are built once here; each constructor clones its template.
    pub fn registry(&self) -> LoadResult<ArchetypeRegistry> {
        let mut registry = ArchetypeRegistry::new();
        for spec in &self.archetypes {
            let template = spec.instantiate(&self.items, &self.abilities, &self.config)?;
            registry.register(spec.tag.clone(), move || template.clone());
        }
        Ok(registry)
    }

    /// Dialogue trees keyed by id.
    pub fn dialogue_map(&self) -> HashMap<String, DialogueTree> {
        self.dialogues
            .iter()
            .map(|tree| (tree.id.clone(), tree.clone()))
            .collect()
    }

    /// Populates a scene, hands the scene's quests to the player and returns
    /// the initial state.
    pub fn new_game(&self, spec: &SceneSpec, game_seed: u64) -> LoadResult<NewGame> {
        let hero = &spec.player.archetype;
        if !self.archetype(hero).is_some_and(ArchetypeSpec::is_playable) {
            anyhow::bail!("Archetype '{}' is not a playable character", hero);
        }
        let mut scene = Scene::new(spec.name.clone(), spec.width, spec.height);

        let mut player = None;
        for placement in spec.initial_placements() {
            let entity = self.place(placement)?;
            if scene.iter().any(|e| e.is_named(&entity.name)) {
                anyhow::bail!("Scene '{}' has two entities named '{}'", spec.name, entity.name);
            }
            let id = scene.spawn(entity);
            player.get_or_insert(id);
        }
        let player: EntityId = player
            .ok_or_else(|| anyhow::anyhow!("Scene '{}' has no player", spec.name))?;

        for placement in &spec.items {
            let mut item = self.items.instantiate(&placement.item)?;
            if let Some(quantity) = placement.quantity {
                item = item.with_quantity(quantity);
            }
            scene.spawn(Entity::ground_item(
                item,
                Position::from_tile(placement.x, placement.y),
            ));
        }

        scene.triggers = spec
            .triggers
            .iter()
            .map(|t| Ok(SpawnTrigger::new(t.condition, self.place(&t.spawn)?)))
            .collect::<LoadResult<Vec<_>>>()?;

        let mut state = GameState::new(scene, player, game_seed);
        for quest in &spec.quests {
            GameEngine::new(&mut state)
                .accept_quest(quest.to_quest())
                .map_err(|e| anyhow::anyhow!("Quest '{}': {}", quest.title, e))?;
        }

        info!(
            scene = %spec.name,
            entities = state.scene.len(),
            triggers = state.scene.triggers.len(),
            seed = game_seed,
            "new game"
        );
        Ok(NewGame {
            state,
            intro: spec.intro.clone(),
        })
    }

    fn place(&self, placement: &Placement) -> LoadResult<Entity> {
        let mut entity = self.instantiate(&placement.archetype)?;
        entity.position = Position::from_tile(placement.x, placement.y);
        if let Some(name) = &placement.name {
            entity.name = name.clone();
        }
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_core::{QuestStatus, Role, SaveRecord, TriggerCondition};

    fn bundled() -> ContentFactory {
        ContentFactory::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn bundled_content_loads() {
        let factory = bundled();
        let catalog = factory.load_catalog().unwrap();
        assert!(catalog.archetype("aeron").is_some());
        assert!(catalog.dialogue_map().contains_key("elder_greeting"));

        let scenes = factory.list_scenes().unwrap();
        assert_eq!(scenes, vec!["aethelgard".to_string(), "monolith_clearing".to_string()]);
        for name in scenes {
            let spec = factory.load_scene(&name).unwrap();
            catalog.new_game(&spec, 7).unwrap();
        }
    }

    #[test]
    fn aethelgard_starts_with_the_sibling_rivalry() {
        let factory = bundled();
        let catalog = factory.load_catalog().unwrap();
        let game = catalog
            .new_game(&factory.load_scene("aethelgard").unwrap(), 1)
            .unwrap();

        let player = game.state.player().unwrap();
        assert_eq!(player.role, Role::Player);
        assert_eq!(player.position.tile(), (5, 5));
        let quest = player
            .character
            .as_ref()
            .unwrap()
            .journal
            .get("The Sibling Rivalry")
            .unwrap();
        assert_eq!(quest.status, QuestStatus::Active);

        assert!(game.state.scene.find_by_name("Kane").is_some());
        assert!(game.state.scene.find_by_name("Ancient Statue").is_some());
        assert!(!game.intro.is_empty());
    }

    #[test]
    fn any_playable_hero_can_lead_a_scene() {
        let factory = bundled();
        let catalog = factory.load_catalog().unwrap();
        let heroes: Vec<_> = catalog.playable().map(|a| a.tag.as_str()).collect();
        assert_eq!(heroes, vec!["aeron", "anastasia", "reverie"]);

        let spec = factory.load_scene("aethelgard").unwrap();
        let game = catalog
            .new_game(&spec.clone().with_player("anastasia"), 3)
            .unwrap();
        let player = game.state.player().unwrap();
        assert_eq!(player.name, "Anastasia");
        assert_eq!(player.position.tile(), (5, 5));
        let sheet = player.character.as_ref().unwrap();
        assert_eq!(sheet.mana.maximum, 150.0);
        assert!(sheet.abilities.is_unlocked("Lulling Whisper"));
        assert!(sheet.journal.get("The Sibling Rivalry").is_some());

        assert!(catalog.new_game(&spec.with_player("kane"), 3).is_err());
    }

    #[test]
    fn registry_restores_a_captured_game() {
        let factory = bundled();
        let catalog = factory.load_catalog().unwrap();
        let game = catalog
            .new_game(&factory.load_scene("monolith_clearing").unwrap(), 99)
            .unwrap();

        let registry = catalog.registry().unwrap();
        assert_eq!(registry.len(), catalog.archetypes.len());
        let restored = SaveRecord::capture(&game.state).restore(&registry).unwrap();
        assert_eq!(restored, game.state);
    }

    #[test]
    fn triggers_carry_their_spawn() {
        let factory = bundled();
        let catalog = factory.load_catalog().unwrap();
        let game = catalog
            .new_game(&factory.load_scene("monolith_clearing").unwrap(), 3)
            .unwrap();

        let trigger = &game.state.scene.triggers[0];
        assert!(matches!(trigger.condition, TriggerCondition::PlayerCrossesX(_)));
        assert_eq!(trigger.spawn.role, Role::Enemy);
        assert!(!trigger.fired);
    }

    #[test]
    fn duplicate_names_in_scene_fail() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        std::fs::write(dir.path().join("items.ron"), "(items: {})").unwrap();
        std::fs::write(dir.path().join("abilities.ron"), "(abilities: [])").unwrap();
        std::fs::write(
            dir.path().join("archetypes.ron"),
            r#"(archetypes: [
                (tag: "hero", name: "Hero", role: Player, character: Some(())),
                (tag: "wolf", name: "Wolf", role: Enemy),
            ])"#,
        )
        .unwrap();

        let catalog = factory.load_catalog().unwrap();
        assert_eq!(catalog.config, GameConfig::default());
        assert!(catalog.dialogues.is_empty());

        let spec = SceneLoader::parse(
            r#"(name: "Den", player: (archetype: "hero", x: 0, y: 0), placements: [
                (archetype: "wolf", x: 3, y: 0),
                (archetype: "wolf", x: 4, y: 0),
            ])"#,
        )
        .unwrap();
        assert!(catalog.new_game(&spec, 0).is_err());
    }
}
