//! Scene: the bounded area that owns every entity currently in play.

use super::common::{EntityId, Position};
use super::entity::Entity;

/// Condition that fires a [`SpawnTrigger`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerCondition {
    /// Player's x coordinate reaches at least this value.
    PlayerCrossesX(f32),
    /// Player's y coordinate reaches at least this value.
    PlayerCrossesY(f32),
    PlayerWithin { center: Position, radius: f32 },
}

impl TriggerCondition {
    pub fn is_met(&self, player: &Position) -> bool {
        match *self {
            TriggerCondition::PlayerCrossesX(x) => player.x >= x,
            TriggerCondition::PlayerCrossesY(y) => player.y >= y,
            TriggerCondition::PlayerWithin { center, radius } => player.distance(&center) <= radius,
        }
    }
}

/// Spawns an entity once when its condition is first met.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpawnTrigger {
    pub condition: TriggerCondition,
    pub spawn: Box<Entity>,
    pub fired: bool,
}

impl SpawnTrigger {
    pub fn new(condition: TriggerCondition, spawn: Entity) -> Self {
        Self {
            condition,
            spawn: Box::new(spawn),
            fired: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scene {
    pub name: String,
    pub width: u32,
    pub height: u32,
    entities: Vec<Entity>,
    next_id: u32,
    pub triggers: Vec<SpawnTrigger>,
}

impl Scene {
    pub const DEFAULT_WIDTH: u32 = 40;
    pub const DEFAULT_HEIGHT: u32 = 10;

    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            entities: Vec::new(),
            next_id: 0,
            triggers: Vec::new(),
        }
    }

    /// Rebuilds a scene from saved parts. Entity ids are kept as stored.
    pub fn from_parts(
        name: String,
        width: u32,
        height: u32,
        entities: Vec<Entity>,
        next_id: u32,
        triggers: Vec<SpawnTrigger>,
    ) -> Self {
        let next_id = entities
            .iter()
            .map(|e| e.id.0 + 1)
            .max()
            .unwrap_or(0)
            .max(next_id);
        Self {
            name,
            width,
            height,
            entities,
            next_id,
            triggers,
        }
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Adds an entity, assigning it the next free id.
    pub fn spawn(&mut self, mut entity: Entity) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = id;
        self.entities.push(entity);
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.index_of(id)?;
        Some(self.entities.remove(index))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Snapshot of ids in spawn order, stable while entities are mutated.
    pub fn ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    /// Finds a visible entity by case-insensitive name.
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.is_visible() && e.is_named(name))
    }

    /// Every visible entity sharing the case-insensitive name, in spawn order.
    pub fn named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a Entity> {
        self.entities
            .iter()
            .filter(move |e| e.is_visible() && e.is_named(name))
    }

    /// First visible entity on the tile containing `position`.
    pub fn object_at(&self, position: &Position) -> Option<&Entity> {
        let tile = position.tile();
        self.entities
            .iter()
            .find(|e| e.is_visible() && e.position.tile() == tile)
    }

    /// Solid entity on the tile containing `position`, other than `except`.
    pub fn blocker_at(&self, position: &Position, except: EntityId) -> Option<&Entity> {
        let tile = position.tile();
        self.entities
            .iter()
            .find(|e| e.id != except && e.is_solid() && e.position.tile() == tile)
    }

    pub fn in_bounds(&self, position: &Position) -> bool {
        let (x, y) = position.tile();
        x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height
    }

    pub fn active_enemies(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(|e| e.is_hostile())
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::types::entity::Role;

    #[test]
    fn spawn_assigns_sequential_ids() {
        let mut scene = Scene::new("Cave", 10, 10);
        let a = scene.spawn(Entity::builder("Aeron", Role::Player).build());
        let b = scene.spawn(Entity::builder("Troll", Role::Enemy).build());
        assert_eq!(a, EntityId(0));
        assert_eq!(b, EntityId(1));
        assert_eq!(scene.find_by_name("troll").map(|e| e.id), Some(b));
    }

    #[test]
    fn object_lookup_uses_tiles() {
        let mut scene = Scene::new("Cave", 10, 10);
        scene.spawn(
            Entity::builder("Statue", Role::Prop)
                .at(Position::from_tile(5, 4))
                .build(),
        );
        assert!(scene.object_at(&Position::new(5.2, 3.9)).is_some());
        assert!(scene.object_at(&Position::from_tile(5, 5)).is_none());
        assert!(!scene.in_bounds(&Position::from_tile(10, 0)));
    }

    #[test]
    fn triggers_check_player_position() {
        let cross = TriggerCondition::PlayerCrossesX(20.0);
        assert!(!cross.is_met(&Position::from_tile(19, 0)));
        assert!(cross.is_met(&Position::from_tile(20, 3)));

        let near = TriggerCondition::PlayerWithin {
            center: Position::from_tile(5, 5),
            radius: 2.0,
        };
        assert!(near.is_met(&Position::from_tile(6, 6)));
    }
}
