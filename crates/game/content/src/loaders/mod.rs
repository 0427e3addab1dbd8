//! Content loaders for reading game data from files.
//!
//! Item, ability, archetype, scene and dialogue catalogs are RON; the rule
//! configuration is TOML. Loaders deserialize straight into `rpg-core` types
//! where those types fit the file format, and into small spec structs where
//! content refers to other content by id.

pub mod abilities;
pub mod archetypes;
pub mod config;
pub mod dialogue;
pub mod factory;
pub mod item;
pub mod scene;

pub use abilities::AbilityLoader;
pub use archetypes::{ArchetypeLoader, ArchetypeSpec, CharacterSpec};
pub use config::ConfigLoader;
pub use dialogue::DialogueLoader;
pub use factory::{ContentCatalog, ContentFactory, NewGame};
pub use item::{ItemCatalog, ItemLoader};
pub use scene::{ItemPlacement, Placement, QuestSpec, SceneLoader, SceneSpec, TriggerSpec};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
