//! Read-only view of the game for renderers.
//!
//! A [`RenderSnapshot`] copies out everything a frontend draws so it never
//! needs to borrow the live state.

use rpg_core::{Entity, GameOutcome, GameState, QuestStatus, Role};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub name: String,
    pub symbol: char,
    pub tile: (i32, i32),
    pub role: Role,
    pub health: u32,
    pub max_health: u32,
    /// Snake-case names of the active statuses.
    pub statuses: Vec<String>,
}

impl EntityView {
    fn from_entity(entity: &Entity) -> Self {
        Self {
            name: entity.name.clone(),
            symbol: entity.symbol,
            tile: entity.position.tile(),
            role: entity.role,
            health: entity.health.current,
            max_health: entity.health.maximum,
            statuses: entity.status.iter().map(|s| s.kind.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestView {
    pub title: String,
    pub status: QuestStatus,
    /// One `target current/required` entry per objective.
    pub progress: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub name: String,
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub stamina: u32,
    pub max_stamina: u32,
    pub level: u32,
    pub experience: u32,
    pub next_level_at: u32,
    pub weapon: Option<String>,
    pub armor: Option<String>,
    /// `name` or `name xN` for stacks.
    pub inventory: Vec<String>,
    pub abilities: Vec<String>,
    pub quests: Vec<QuestView>,
    pub statuses: Vec<String>,
}

impl PlayerView {
    fn from_entity(entity: &Entity) -> Self {
        let mut view = Self {
            name: entity.name.clone(),
            health: entity.health.current,
            max_health: entity.health.maximum,
            statuses: entity.status.iter().map(|s| s.kind.to_string()).collect(),
            ..Self::default()
        };
        let Some(sheet) = entity.character.as_deref() else {
            return view;
        };

        view.mana = sheet.mana.whole();
        view.max_mana = sheet.mana.maximum as u32;
        view.stamina = sheet.stamina.whole();
        view.max_stamina = sheet.stamina.maximum as u32;
        view.level = sheet.level;
        view.experience = sheet.experience;
        view.next_level_at = sheet.next_level_at;
        view.weapon = sheet.equipment.weapon.as_ref().map(|i| i.name.clone());
        view.armor = sheet.equipment.armor.as_ref().map(|i| i.name.clone());
        view.inventory = sheet
            .inventory
            .iter()
            .map(|item| match item.quantity() {
                1 => item.name.clone(),
                n => format!("{} x{}", item.name, n),
            })
            .collect();
        view.abilities = sheet.abilities.unlocked().map(|a| a.name.clone()).collect();
        view.quests = sheet
            .journal
            .iter()
            .map(|quest| QuestView {
                title: quest.title.clone(),
                status: quest.status,
                progress: quest
                    .objectives
                    .iter()
                    .map(|o| format!("{} {}/{}", o.target, o.current, o.required))
                    .collect(),
            })
            .collect();
        view
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueView {
    pub speaker: String,
    pub text: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub scene: String,
    pub width: u32,
    pub height: u32,
    pub tick: u64,
    /// Visible entities in spawn order.
    pub entities: Vec<EntityView>,
    pub player: PlayerView,
    pub log: Vec<String>,
    pub dialogue: Option<DialogueView>,
    pub outcome: GameOutcome,
}

impl RenderSnapshot {
    pub fn capture<'a>(state: &GameState, log: impl IntoIterator<Item = &'a str>) -> Self {
        let dialogue = state
            .conversation
            .as_ref()
            .and_then(|c| c.current_node())
            .map(|node| DialogueView {
                speaker: node.speaker.clone(),
                text: node.text.clone(),
                options: node.options.iter().map(|o| o.label.clone()).collect(),
            });

        Self {
            scene: state.scene.name.clone(),
            width: state.scene.width,
            height: state.scene.height,
            tick: state.turn.tick.0,
            entities: state
                .scene
                .iter()
                .filter(|e| e.is_visible())
                .map(EntityView::from_entity)
                .collect(),
            player: state
                .player()
                .map(PlayerView::from_entity)
                .unwrap_or_default(),
            log: log.into_iter().map(str::to_string).collect(),
            dialogue,
            outcome: state.outcome,
        }
    }

    /// The entity drawn on `tile`, preferring solid ones over pickups.
    pub fn entity_at(&self, tile: (i32, i32)) -> Option<&EntityView> {
        let mut on_tile = self.entities.iter().filter(|e| e.tile == tile);
        let first = on_tile.next()?;
        if first.role != Role::Item {
            return Some(first);
        }
        on_tile.find(|e| e.role != Role::Item).or(Some(first))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_core::{
        CharacterSheet, ConsumableEffect, Item, Position, Quest, StatusKind,
    };
    use rpg_core::{Objective, ObjectiveKind, Scene};

    fn state() -> GameState {
        let mut scene = Scene::new("Aethelgard", 40, 10);
        let mut sheet = CharacterSheet::default();
        sheet
            .inventory
            .add(Item::consumable("Health Potion", ConsumableEffect::Heal(20)).with_quantity(2))
            .unwrap();
        let mut quest = Quest::new("The Sibling Rivalry", "Defeat Kane.")
            .with_objective(Objective::new(ObjectiveKind::Defeat, "Kane", 1));
        quest.activate().unwrap();
        sheet.journal.insert(quest);

        let player = scene.spawn(
            Entity::builder("Aeron", Role::Player)
                .at(Position::from_tile(5, 5))
                .character(sheet)
                .build(),
        );
        scene.spawn(Entity::ground_item(
            Item::weapon("Valiant Sword", 25),
            Position::from_tile(6, 5),
        ));
        let mut kane = Entity::builder("Kane", Role::Enemy)
            .symbol('K')
            .at(Position::from_tile(6, 5))
            .build();
        kane.status.apply(StatusKind::ArmorBreak, 2.0, 0.0);
        scene.spawn(kane);
        let mut hidden = Entity::builder("Ghost", Role::Enemy).build();
        hidden.mark_defeated();
        scene.spawn(hidden);

        GameState::new(scene, player, 0)
    }

    #[test]
    fn captures_visible_entities_and_player_sheet() {
        let snapshot = RenderSnapshot::capture(&state(), ["Welcome."]);

        assert_eq!(snapshot.entities.len(), 3);
        assert_eq!(snapshot.player.inventory, vec!["Health Potion x2".to_string()]);
        assert_eq!(snapshot.player.quests[0].progress, vec!["Kane 0/1".to_string()]);
        assert_eq!(snapshot.player.level, 1);
        assert_eq!(snapshot.log, vec!["Welcome.".to_string()]);
        assert!(snapshot.dialogue.is_none());
    }

    #[test]
    fn solid_entities_are_drawn_over_items() {
        let snapshot = RenderSnapshot::capture(&state(), std::iter::empty());
        let drawn = snapshot.entity_at((6, 5)).unwrap();
        assert_eq!(drawn.symbol, 'K');
        assert_eq!(drawn.statuses, vec!["armor_break".to_string()]);
        assert!(snapshot.entity_at((0, 0)).is_none());
    }
}
