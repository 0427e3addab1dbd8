//! Defeat handling, experience and quest progress.

use super::Turn;
use crate::events::GameEvent;
use crate::progression::gain_experience;
use crate::state::{EntityId, ObjectiveKind, Role};

impl Turn<'_, '_> {
    /// Runs after an entity's health reached zero.
    ///
    /// Defeated enemies pay their experience to `by` when it is a character,
    /// otherwise to the player (poison kills), and advance `Defeat` objectives
    /// matching either their name or their class.
    pub(super) fn handle_defeat(&mut self, id: EntityId, by: Option<EntityId>) {
        self.emit(GameEvent::Defeated { entity: id, by });

        let Some(entity) = self.state.scene.get(id) else {
            return;
        };
        if entity.role != Role::Enemy {
            return;
        }
        let (name, class, xp) = (entity.name.clone(), entity.class.clone(), entity.xp_value);

        let recipient = by
            .filter(|&attacker| {
                self.state
                    .scene
                    .get(attacker)
                    .is_some_and(|e| e.character.is_some())
            })
            .unwrap_or(self.state.player);
        self.award_experience(recipient, xp);

        if class.eq_ignore_ascii_case(&name) {
            self.record_quest(ObjectiveKind::Defeat, &[name.as_str()]);
        } else {
            self.record_quest(ObjectiveKind::Defeat, &[name.as_str(), class.as_str()]);
        }
    }

    pub(super) fn award_experience(&mut self, id: EntityId, amount: u32) {
        if amount == 0 {
            return;
        }
        let config = self.env.config;
        let Some(entity) = self.state.scene.get_mut(id) else {
            return;
        };
        if entity.character.is_none() {
            return;
        }

        let report = gain_experience(entity, amount, &config.experience);
        self.emit(GameEvent::ExperienceGained { entity: id, amount });
        for level in (report.level + 1 - report.levels_gained)..=report.level {
            self.emit(GameEvent::LeveledUp { entity: id, level });
        }
        for ability in report.unlocked {
            self.emit(GameEvent::AbilityUnlocked { entity: id, ability });
        }
    }

    /// Advances the player's quests and completes the ones now satisfied.
    pub(super) fn record_quest(&mut self, kind: ObjectiveKind, targets: &[&str]) {
        let player = self.state.player;
        let Some(sheet) = self
            .state
            .scene
            .get_mut(player)
            .and_then(|e| e.character.as_deref_mut())
        else {
            return;
        };

        let mut progressed: Vec<String> = Vec::new();
        for target in targets {
            for title in sheet.journal.record(kind, target) {
                if !progressed.contains(&title) {
                    progressed.push(title);
                }
            }
        }
        if progressed.is_empty() {
            return;
        }
        let completed = sheet.journal.complete_ready();

        for quest in progressed {
            self.emit(GameEvent::QuestProgressed { quest });
        }
        for quest in completed {
            self.emit(GameEvent::QuestCompleted {
                quest: quest.title,
                reward: quest.reward_experience,
            });
            self.award_experience(player, quest.reward_experience);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::action::Intent;
    use crate::ai::Brain;
    use crate::config::GameConfig;
    use crate::engine::GameEngine;
    use crate::env::{FixedRng, GameEnv, NoDialogue};
    use crate::events::GameEvent;
    use crate::state::{
        CharacterSheet, Entity, GameState, Objective, ObjectiveKind, Position, Quest, QuestStatus,
        Role, Scene,
    };

    fn goblin_camp() -> GameState {
        let mut scene = Scene::new("Camp", 10, 5);
        let player = scene.spawn(
            Entity::builder("Aeron", Role::Player)
                .at(Position::from_tile(1, 1))
                .character(CharacterSheet::default())
                .build(),
        );
        for (name, tile) in [("Snag", (2, 1)), ("Grub", (1, 2))] {
            scene.spawn(
                Entity::builder(name, Role::Enemy)
                    .class("goblin")
                    .at(Position::from_tile(tile.0, tile.1))
                    .health(1)
                    .xp_value(30)
                    .brain(Brain::default())
                    .build(),
            );
        }
        GameState::new(scene, player, 3)
    }

    #[test]
    fn defeat_objective_matches_class_and_pays_reward() {
        let mut state = goblin_camp();
        let config = GameConfig::default();
        let rng = FixedRng::percent(99.0);
        let env = GameEnv::new(&config, &rng, &NoDialogue);

        let quest = Quest::new("Goblin Trouble", "Thin out the camp")
            .with_objective(Objective::new(ObjectiveKind::Defeat, "Goblin", 2))
            .with_reward(50);
        GameEngine::new(&mut state).accept_quest(quest).unwrap();

        GameEngine::new(&mut state)
            .execute(env, &Intent::Attack { target: "snag".into() })
            .unwrap();
        let last = GameEngine::new(&mut state)
            .execute(env, &Intent::Attack { target: "grub".into() })
            .unwrap();

        assert!(last.events.contains(&GameEvent::QuestCompleted {
            quest: "Goblin Trouble".into(),
            reward: 50,
        }));
        // 30 + 30 kills, then 50 reward: one level at 100, 10 left over.
        assert!(last.events.contains(&GameEvent::LeveledUp {
            entity: state.player,
            level: 2,
        }));
        let sheet = state.player().unwrap().character.as_ref().unwrap();
        assert_eq!(sheet.level, 2);
        assert_eq!(sheet.experience, 10);
        assert_eq!(
            sheet.journal.get("goblin trouble").unwrap().status,
            QuestStatus::Completed
        );
    }
}
