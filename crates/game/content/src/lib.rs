//! Data-driven content definitions and loaders.
//!
//! This crate reads the static content of a game from RON/TOML data files:
//! - Rule configuration (TOML)
//! - Item catalogs keyed by content id
//! - Ability definitions
//! - Archetypes: entity templates identified by a stable class tag
//! - Dialogue trees
//! - Scene layouts with spawn triggers and starting quests
//!
//! [`ContentCatalog`] turns those files into a ready [`rpg_core::GameState`]
//! and into the [`rpg_core::ArchetypeRegistry`] that save restoration needs.
//! Content never lives in saves; only class tags do.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    AbilityLoader, ArchetypeLoader, ArchetypeSpec, CharacterSpec, ConfigLoader, ContentCatalog,
    ContentFactory, DialogueLoader, ItemCatalog, ItemLoader, ItemPlacement, NewGame, Placement,
    QuestSpec, SceneLoader, SceneSpec, TriggerSpec,
};
