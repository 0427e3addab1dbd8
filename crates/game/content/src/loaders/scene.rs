//! Scene layout loader.
//!
//! A scene file places archetypes and items on a grid, declares spawn
//! triggers and the quests handed to the player at the start.

use std::path::Path;

use rpg_core::{Objective, ObjectiveKind, Quest, Scene, TriggerCondition};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// An archetype placed on a tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub archetype: String,
    pub x: i32,
    pub y: i32,
    /// Overrides the archetype name, for several entities of one archetype.
    #[serde(default)]
    pub name: Option<String>,
}

/// An item lying on a tile at scene start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPlacement {
    pub item: String,
    pub x: i32,
    pub y: i32,
    /// Stack size for consumables.
    #[serde(default)]
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerSpec {
    pub condition: TriggerCondition,
    pub spawn: Placement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveSpec {
    pub kind: ObjectiveKind,
    pub target: String,
    #[serde(default = "default_required")]
    pub required: u32,
}

fn default_required() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestSpec {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub objectives: Vec<ObjectiveSpec>,
    #[serde(default)]
    pub reward: u32,
}

impl QuestSpec {
    pub fn to_quest(&self) -> Quest {
        self.objectives.iter().fold(
            Quest::new(self.title.clone(), self.description.clone()).with_reward(self.reward),
            |quest, o| quest.with_objective(Objective::new(o.kind, o.target.clone(), o.required)),
        )
    }
}

fn default_width() -> u32 {
    Scene::DEFAULT_WIDTH
}

fn default_height() -> u32 {
    Scene::DEFAULT_HEIGHT
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSpec {
    pub name: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    pub player: Placement,
    #[serde(default)]
    pub placements: Vec<Placement>,
    #[serde(default)]
    pub items: Vec<ItemPlacement>,
    #[serde(default)]
    pub triggers: Vec<TriggerSpec>,
    #[serde(default)]
    pub quests: Vec<QuestSpec>,
    /// Lines shown in the message log when the scene starts.
    #[serde(default)]
    pub intro: Vec<String>,
}

impl SceneSpec {
    /// Every placement that starts in the scene, player first.
    pub fn initial_placements(&self) -> impl Iterator<Item = &Placement> {
        std::iter::once(&self.player).chain(self.placements.iter())
    }

    /// Starts the scene with another hero on the same tile.
    #[must_use]
    pub fn with_player(mut self, archetype: impl Into<String>) -> Self {
        self.player.archetype = archetype.into();
        self.player.name = None;
        self
    }
}

/// Loader for scene layouts from RON files.
pub struct SceneLoader;

impl SceneLoader {
    pub fn load(path: &Path) -> LoadResult<SceneSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<SceneSpec> {
        let spec: SceneSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scene RON: {}", e))?;

        if spec.width == 0 || spec.height == 0 {
            anyhow::bail!("Scene '{}' has an empty grid", spec.name);
        }
        let out_of_bounds = spec
            .initial_placements()
            .chain(spec.triggers.iter().map(|t| &t.spawn))
            .map(|p| (p.x, p.y))
            .chain(spec.items.iter().map(|i| (i.x, i.y)))
            .find(|&(x, y)| x < 0 || y < 0 || x as u32 >= spec.width || y as u32 >= spec.height);
        if let Some((x, y)) = out_of_bounds {
            anyhow::bail!("Scene '{}' places something outside the grid at ({}, {})", spec.name, x, y);
        }
        Ok(spec)
    }
}
