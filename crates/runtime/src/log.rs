//! In-game message log.
//!
//! The log keeps the last few lines shown under the map. It is separate from
//! diagnostic logging through `tracing`.

use std::collections::VecDeque;

use rpg_core::{AiState, EntityId, GameEvent, GameState};

/// Bounded list of the most recent messages, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl MessageLog {
    pub const DEFAULT_CAPACITY: usize = 5;

    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, line: impl Into<String>) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line.into());
    }

    pub fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for line in lines {
            self.push(line);
        }
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

fn name(state: &GameState, id: EntityId) -> &str {
    state
        .scene
        .get(id)
        .map(|e| e.name.as_str())
        .unwrap_or("Something")
}

/// Renders one event as a log line, looking names up in `state`.
///
/// Returns `None` for events the player does not need to read about, such
/// as the player's own movement.
pub fn describe(event: &GameEvent, state: &GameState) -> Option<String> {
    let line = match event {
        GameEvent::Moved { entity, .. } => {
            if *entity == state.player {
                return None;
            }
            format!("{} advances.", name(state, *entity))
        }
        GameEvent::AttackEvaded { attacker, defender } => format!(
            "{} evades {}'s attack!",
            name(state, *defender),
            name(state, *attacker)
        ),
        GameEvent::AttackMissed { attacker, defender } => format!(
            "{} misses {}.",
            name(state, *attacker),
            name(state, *defender)
        ),
        GameEvent::AttackHit {
            attacker,
            defender,
            damage,
            critical,
        } => {
            let prefix = if *critical { "Critical hit! " } else { "" };
            format!(
                "{}{} hits {} for {} damage.",
                prefix,
                name(state, *attacker),
                name(state, *defender),
                damage
            )
        }
        GameEvent::StatusDamage {
            entity,
            kind,
            damage,
        } => format!("{} takes {} {} damage.", name(state, *entity), damage, kind),
        GameEvent::Healed { entity, amount } => {
            format!("{} recovers {} health.", name(state, *entity), amount)
        }
        GameEvent::ManaRestored { entity, amount } => {
            format!("{} restores {} mana.", name(state, *entity), amount)
        }
        GameEvent::Defeated { entity, .. } => {
            format!("{} has been defeated!", name(state, *entity))
        }
        GameEvent::StatusApplied {
            entity,
            kind,
            duration,
        } => format!(
            "{} is afflicted with {} for {}s.",
            name(state, *entity),
            kind,
            duration
        ),
        GameEvent::StatusExpired { entity, kind } => {
            format!("{}'s {} wears off.", name(state, *entity), kind)
        }
        GameEvent::Incapacitated { entity } => {
            format!("{} is unable to act.", name(state, *entity))
        }
        GameEvent::AiStateChanged { entity, to, .. } => match to {
            AiState::Chasing => format!(
                "{} starts chasing {}!",
                name(state, *entity),
                name(state, state.player)
            ),
            AiState::Attacking => format!("{} closes in to attack!", name(state, *entity)),
            AiState::Idle => return None,
        },
        GameEvent::AbilityCast {
            caster,
            ability,
            target,
        } => {
            if caster == target {
                format!("{} casts {}.", name(state, *caster), ability)
            } else {
                format!(
                    "{} casts {} on {}.",
                    name(state, *caster),
                    ability,
                    name(state, *target)
                )
            }
        }
        GameEvent::ItemPickedUp {
            entity,
            item,
            quantity,
        } => {
            if *quantity > 1 {
                format!("{} picks up {} (x{}).", name(state, *entity), item, quantity)
            } else {
                format!("{} picks up {}.", name(state, *entity), item)
            }
        }
        GameEvent::ItemUsed {
            entity,
            item,
            target,
        } => {
            if entity == target {
                format!("{} uses {}.", name(state, *entity), item)
            } else {
                format!(
                    "{} uses {} on {}.",
                    name(state, *entity),
                    item,
                    name(state, *target)
                )
            }
        }
        GameEvent::ItemEquipped {
            entity,
            item,
            replaced,
        } => match replaced {
            Some(old) => format!(
                "{} equips {} and stows {}.",
                name(state, *entity),
                item,
                old
            ),
            None => format!("{} equips {}.", name(state, *entity), item),
        },
        GameEvent::ItemDropped { entity, item } => {
            format!("{} drops {}.", name(state, *entity), item)
        }
        GameEvent::Examined {
            target,
            description,
        } => format!("{}: {}", name(state, *target), description),
        GameEvent::ExperienceGained { entity, amount } => {
            format!("{} gains {} XP.", name(state, *entity), amount)
        }
        GameEvent::LeveledUp { entity, level } => {
            format!("{} reached level {}!", name(state, *entity), level)
        }
        GameEvent::AbilityUnlocked { entity, ability } => {
            format!("{} learned {}!", name(state, *entity), ability)
        }
        GameEvent::QuestProgressed { quest } => format!("Quest updated: {}", quest),
        GameEvent::QuestCompleted { quest, reward } => {
            format!("Quest completed: {} (+{} XP)", quest, reward)
        }
        GameEvent::ConversationStarted { .. } => "A conversation begins.".to_string(),
        GameEvent::DialogueLine { speaker, text, .. } => format!("{}: {}", speaker, text),
        GameEvent::ConversationEnded => "The conversation ends.".to_string(),
        GameEvent::EntitySpawned { entity } => format!("{} appears!", name(state, *entity)),
        GameEvent::Waited { entity } => format!("{} waits.", name(state, *entity)),
    };
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_core::{Entity, Position, Role, Scene, StatusKind};

    fn state() -> GameState {
        let mut scene = Scene::new("Arena", 10, 10);
        let player = scene.spawn(Entity::builder("Aeron", Role::Player).build());
        scene.spawn(
            Entity::builder("Kane", Role::Enemy)
                .at(Position::from_tile(3, 0))
                .build(),
        );
        GameState::new(scene, player, 0)
    }

    #[test]
    fn keeps_only_the_newest_lines() {
        let mut log = MessageLog::new(2);
        log.extend(["one", "two", "three"]);
        assert_eq!(log.lines().collect::<Vec<_>>(), vec!["two", "three"]);
    }

    #[test]
    fn describes_combat_with_names() {
        let state = state();
        let kane = EntityId(1);

        let hit = GameEvent::AttackHit {
            attacker: state.player,
            defender: kane,
            damage: 27,
            critical: true,
        };
        assert_eq!(
            describe(&hit, &state).unwrap(),
            "Critical hit! Aeron hits Kane for 27 damage."
        );

        let poison = GameEvent::StatusDamage {
            entity: kane,
            kind: StatusKind::Poison,
            damage: 5,
        };
        assert_eq!(describe(&poison, &state).unwrap(), "Kane takes 5 poison damage.");
    }

    #[test]
    fn player_movement_is_silent() {
        let state = state();
        let moved = GameEvent::Moved {
            entity: state.player,
            to: Position::from_tile(1, 0),
        };
        assert!(describe(&moved, &state).is_none());

        let chase = GameEvent::AiStateChanged {
            entity: EntityId(1),
            from: AiState::Idle,
            to: AiState::Chasing,
        };
        assert_eq!(describe(&chase, &state).unwrap(), "Kane starts chasing Aeron!");
    }
}
