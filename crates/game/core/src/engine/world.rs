//! World pass: everything that happens after the player has acted.

use super::Turn;
use crate::ai::AiDecision;
use crate::combat::take_damage;
use crate::events::GameEvent;
use crate::state::{EntityId, GameOutcome, Role, StatusKind};

/// Fraction of the attack range at which a chaser stops. Past half a tile on
/// at least one axis, so a chaser never rounds onto a target standing on a
/// tile centre, yet still inside the attack range.
const CHASE_STOP: f32 = 0.75;

impl Turn<'_, '_> {
    /// Advances the world by one tick.
    ///
    /// Non-player entities are visited in spawn order: AI first, then status
    /// decay. The player's statuses decay last, then every character
    /// regenerates its pools.
    pub(super) fn world_pass(&mut self) {
        let delta = self.env.config.tick_seconds;
        let player = self.state.player;

        for id in self.state.scene.ids() {
            if id == player {
                continue;
            }
            let Some(entity) = self.state.scene.get(id) else {
                continue;
            };
            if !entity.is_active_combatant() {
                continue;
            }
            if entity.brain.is_some() {
                if entity.status.is_incapacitated() {
                    self.emit(GameEvent::Incapacitated { entity: id });
                } else {
                    self.ai_step(id, delta);
                }
            }
            self.decay_status(id, delta);
        }

        self.decay_status(player, delta);
        self.regenerate(delta);

        let turn = &mut self.state.turn;
        turn.tick = turn.tick.next();
        turn.elapsed += delta;
    }

    fn ai_step(&mut self, id: EntityId, delta: f32) {
        let config = self.env.config;
        let player = self.state.player;
        let Some(target) = self
            .state
            .player()
            .filter(|p| !p.is_defeated())
            .map(|p| p.position)
        else {
            return;
        };
        let Some(entity) = self.state.scene.get_mut(id) else {
            return;
        };
        let slowed = entity.status.has(StatusKind::Slow);
        let Some(brain) = entity.brain.as_mut() else {
            return;
        };

        let distance = entity.position.distance(&target);
        let (previous, decision) = brain.think(distance, config.attack_range);
        let current = brain.state;

        let moved = match decision {
            AiDecision::Advance => {
                let mut step = entity.speed * delta;
                if slowed {
                    step *= config.slow_factor;
                }
                let travel = (distance - config.attack_range * CHASE_STOP)
                    .max(0.0)
                    .min(step);
                if travel > 0.0 {
                    entity.position = entity.position.step_toward(&target, travel);
                    Some(entity.position)
                } else {
                    None
                }
            }
            AiDecision::Hold | AiDecision::Strike => None,
        };

        if previous != current {
            self.emit(GameEvent::AiStateChanged {
                entity: id,
                from: previous,
                to: current,
            });
        }
        if let Some(to) = moved {
            self.emit(GameEvent::Moved { entity: id, to });
        }
        if decision == AiDecision::Strike {
            self.attack(id, player);
        }
    }

    fn decay_status(&mut self, id: EntityId, delta: f32) {
        let Some(entity) = self.state.scene.get_mut(id) else {
            return;
        };
        if entity.is_defeated() {
            return;
        }

        let report = entity.status.tick(delta);
        let mut events = Vec::new();
        let mut defeated = false;
        for periodic in report.periodic.iter().filter(|p| p.amount > 0) {
            let damage = take_damage(entity, periodic.amount, true);
            defeated |= damage.defeated;
            events.push(GameEvent::StatusDamage {
                entity: id,
                kind: periodic.kind,
                damage: damage.dealt,
            });
        }
        events.extend(
            report
                .expired
                .iter()
                .map(|&kind| GameEvent::StatusExpired { entity: id, kind }),
        );

        self.events.extend(events);
        if defeated {
            self.handle_defeat(id, None);
        }
    }

    fn regenerate(&mut self, delta: f32) {
        for id in self.state.scene.ids() {
            if let Some(entity) = self.state.scene.get_mut(id) {
                if entity.is_defeated() {
                    continue;
                }
                if let Some(sheet) = entity.character.as_deref_mut() {
                    sheet.regenerate(delta);
                }
            }
        }
    }

    /// Spawns the entity of every unfired trigger the player now satisfies.
    pub(super) fn fire_triggers(&mut self) {
        let Some(position) = self.state.player().map(|p| p.position) else {
            return;
        };
        let pending: Vec<_> = self
            .state
            .scene
            .triggers
            .iter_mut()
            .filter(|t| !t.fired && t.condition.is_met(&position))
            .map(|t| {
                t.fired = true;
                (*t.spawn).clone()
            })
            .collect();

        for entity in pending {
            let id = self.state.scene.spawn(entity);
            self.emit(GameEvent::EntitySpawned { entity: id });
        }
    }

    /// Defeat when the player is down. Victory once every enemy that took
    /// part is defeated and no trigger is left to spawn another.
    pub(super) fn evaluate_outcome(&mut self) {
        if self.state.is_over() {
            return;
        }
        let scene = &self.state.scene;

        let player_down = self.state.player().is_none_or(|p| p.is_defeated());
        let fought = scene.iter().any(|e| e.role == Role::Enemy);
        let enemies_left = scene.active_enemies().next().is_some();
        let reinforcements = scene
            .triggers
            .iter()
            .any(|t| !t.fired && t.spawn.role == Role::Enemy);

        self.state.outcome = if player_down {
            GameOutcome::Defeat
        } else if fought && !enemies_left && !reinforcements {
            GameOutcome::Victory
        } else {
            GameOutcome::InProgress
        };
    }
}
