//! Player intents.

use super::Turn;
use crate::action::{ActionError, Intent};
use crate::combat::{AttackOutcome, AttackProfile, heal, resolve_attack, take_damage};
use crate::dialogue::{DialogueManager, DialogueNode};
use crate::events::GameEvent;
use crate::state::{
    AbilityEffect, AddOutcome, ConsumableEffect, Direction, Entity, EntityId, ObjectiveKind,
    Position, ResourceKind, StatusKind,
};

/// Furthest distance at which the player can start a conversation.
pub(super) const TALK_RANGE: f32 = 2.0;

const NOTHING_SPECIAL: &str = "You see nothing special.";

impl Turn<'_, '_> {
    pub(super) fn resolve(&mut self, intent: &Intent) -> Result<(), ActionError> {
        match intent {
            Intent::Move(direction) => self.move_player(*direction),
            Intent::Attack { target } => self.player_attack(target),
            Intent::Use { item, target } => self.use_item(item, target.as_deref()),
            Intent::Cast { ability, target } => self.cast(ability, target.as_deref()),
            Intent::Examine { target } => self.examine(target),
            Intent::Talk { target } => self.talk(target),
            Intent::Choose { index } => self.choose(*index),
            Intent::Pickup { item } => self.pickup(item),
            Intent::Equip { item } => self.equip(item),
            Intent::Drop { item } => self.drop_item(item),
            Intent::Wait => {
                let player = self.state.player;
                self.emit(GameEvent::Waited { entity: player });
                Ok(())
            }
        }
    }

    fn move_player(&mut self, direction: Direction) -> Result<(), ActionError> {
        let player = self.player()?;
        let id = player.id;
        let (x, y) = player.position.tile();
        let (dx, dy) = direction.delta();
        let to = Position::from_tile(x + dx, y + dy);

        if !self.state.scene.in_bounds(&to) {
            return Err(ActionError::OutOfBounds);
        }
        if let Some(blocker) = self.state.scene.blocker_at(&to, id) {
            return Err(ActionError::PathBlocked(blocker.name.clone()));
        }

        self.entity_mut(id)?.position = to;
        self.emit(GameEvent::Moved { entity: id, to });
        self.fire_triggers();
        Ok(())
    }

    fn player_attack(&mut self, target: &str) -> Result<(), ActionError> {
        let player = self.state.player;
        let defender = self.combatant(target)?;
        if defender == player {
            return Err(ActionError::InvalidTarget(target.trim().to_string()));
        }
        self.attack(player, defender)
            .map(|_| ())
            .ok_or_else(|| ActionError::TargetNotFound(target.trim().to_string()))
    }

    /// Resolves one attack and its consequences. `None` when either side is
    /// missing from the scene.
    pub(super) fn attack(
        &mut self,
        attacker: EntityId,
        defender: EntityId,
    ) -> Option<AttackOutcome> {
        let profile = AttackProfile::of(self.state.scene.get(attacker)?);
        let rolls = self.attack_rolls(attacker);
        let config = self.env.config;
        let target = self.state.scene.get_mut(defender)?;
        let outcome = resolve_attack(&profile, target, rolls, config);

        match outcome {
            AttackOutcome::Evaded => self.emit(GameEvent::AttackEvaded { attacker, defender }),
            AttackOutcome::Missed => self.emit(GameEvent::AttackMissed { attacker, defender }),
            AttackOutcome::Hit {
                damage,
                critical,
                defeated,
            } => {
                self.emit(GameEvent::AttackHit {
                    attacker,
                    defender,
                    damage,
                    critical,
                });
                if defeated {
                    self.handle_defeat(defender, Some(attacker));
                }
            }
        }
        Some(outcome)
    }

    fn use_item(&mut self, item: &str, target: Option<&str>) -> Result<(), ActionError> {
        let user = self.player()?.id;
        let sheet = self.sheet(user)?;
        let effect = sheet.inventory.peek_consumable(item)?;
        let name = sheet
            .inventory
            .find(item)
            .map(|held| held.name.clone())
            .unwrap_or_else(|| item.to_string());

        let target = match target {
            Some(target) => self.combatant(target)?,
            None => user,
        };

        self.sheet_mut(user)?.inventory.take_consumable(item)?;
        self.emit(GameEvent::ItemUsed {
            entity: user,
            item: name,
            target,
        });
        self.apply_consumable(target, effect)
    }

    fn apply_consumable(
        &mut self,
        target: EntityId,
        effect: ConsumableEffect,
    ) -> Result<(), ActionError> {
        match effect {
            ConsumableEffect::Heal(amount) => {
                let healed = heal(self.entity_mut(target)?, amount);
                self.emit(GameEvent::Healed {
                    entity: target,
                    amount: healed,
                });
            }
            ConsumableEffect::RestoreMana(amount) => {
                let restored = match self.entity_mut(target)?.character.as_deref_mut() {
                    Some(sheet) => sheet.pool_mut(ResourceKind::Mana).restore(amount as f32),
                    None => 0.0,
                };
                self.emit(GameEvent::ManaRestored {
                    entity: target,
                    amount: restored.round() as u32,
                });
            }
            ConsumableEffect::ApplyStatus {
                kind,
                duration,
                potency,
            } => self.apply_status(target, kind, duration, potency)?,
        }
        Ok(())
    }

    pub(super) fn apply_status(
        &mut self,
        target: EntityId,
        kind: StatusKind,
        duration: f32,
        potency: f32,
    ) -> Result<(), ActionError> {
        self.entity_mut(target)?.status.apply(kind, duration, potency);
        self.emit(GameEvent::StatusApplied {
            entity: target,
            kind,
            duration,
        });
        Ok(())
    }

    fn cast(&mut self, ability: &str, target: Option<&str>) -> Result<(), ActionError> {
        let caster = self.player()?.id;
        let sheet = self.sheet(caster)?;
        let ability = sheet
            .abilities
            .get(ability)
            .cloned()
            .ok_or_else(|| ActionError::UnknownAbility(ability.trim().to_string()))?;

        let pool = sheet.pool(ability.cost_type);
        if !pool.can_afford(ability.cost) {
            return Err(ActionError::InsufficientResource {
                ability: ability.name.clone(),
                resource: ability.cost_type,
                required: ability.cost,
                available: pool.whole(),
            });
        }

        let target = match target {
            Some(target) => self.combatant(target)?,
            None => caster,
        };
        let harmful = ability
            .effects()
            .any(|effect| matches!(effect, AbilityEffect::Damage(_)));
        if harmful && target == caster {
            return Err(ActionError::InvalidTarget(ability.name));
        }

        self.sheet_mut(caster)?
            .pool_mut(ability.cost_type)
            .spend(ability.cost);
        self.emit(GameEvent::AbilityCast {
            caster,
            ability: ability.name.clone(),
            target,
        });

        for effect in ability.effects() {
            if self.entity_mut(target)?.is_defeated() {
                break;
            }
            self.apply_ability_effect(caster, target, effect)?;
        }
        Ok(())
    }

    fn apply_ability_effect(
        &mut self,
        caster: EntityId,
        target: EntityId,
        effect: AbilityEffect,
    ) -> Result<(), ActionError> {
        match effect {
            AbilityEffect::Damage(amount) => {
                let report = take_damage(self.entity_mut(target)?, amount, false);
                self.emit(GameEvent::AttackHit {
                    attacker: caster,
                    defender: target,
                    damage: report.dealt,
                    critical: false,
                });
                if report.defeated {
                    self.handle_defeat(target, Some(caster));
                }
            }
            AbilityEffect::Heal(amount) => {
                let healed = heal(self.entity_mut(target)?, amount);
                self.emit(GameEvent::Healed {
                    entity: target,
                    amount: healed,
                });
            }
            AbilityEffect::ApplyStatus {
                kind,
                duration,
                potency,
            } => self.apply_status(target, kind, duration, potency)?,
        }
        Ok(())
    }

    fn examine(&mut self, target: &str) -> Result<(), ActionError> {
        let entity = self.find(target)?;
        let event = GameEvent::Examined {
            target: entity.id,
            description: entity
                .description
                .clone()
                .unwrap_or_else(|| NOTHING_SPECIAL.to_string()),
        };
        self.emit(event);
        Ok(())
    }

    fn talk(&mut self, target: &str) -> Result<(), ActionError> {
        let position = self.player()?.position;
        let npc = self.nearest_named(target, |e| e.position.distance(&position) <= TALK_RANGE)?;
        let dialogue = npc
            .dialogue
            .clone()
            .ok_or_else(|| ActionError::NothingToSay(npc.name.clone()))?;
        let (with, name) = (npc.id, npc.name.clone());

        let tree = self
            .env
            .dialogues
            .tree(&dialogue)
            .ok_or(ActionError::BrokenDialogue(dialogue))?;
        let manager = DialogueManager::new(tree)?;

        self.emit(GameEvent::ConversationStarted { with });
        if let Some(node) = manager.current_node() {
            let line = dialogue_line(node);
            self.emit(line);
        }
        self.state.conversation = Some(manager);
        self.record_quest(ObjectiveKind::Talk, &[name.as_str()]);
        Ok(())
    }

    fn choose(&mut self, index: usize) -> Result<(), ActionError> {
        let manager = self
            .state
            .conversation
            .as_mut()
            .ok_or(ActionError::NoConversation)?;
        let next = manager.select(index)?.cloned();

        match next {
            Some(node) => self.emit(dialogue_line(&node)),
            None => {
                self.state.conversation = None;
                self.emit(GameEvent::ConversationEnded);
            }
        }
        Ok(())
    }

    fn pickup(&mut self, item: &str) -> Result<(), ActionError> {
        let player = self.player()?;
        let (id, position) = (player.id, player.position);

        let ground = self.nearest_named(item, |e| {
            e.item.is_some() && position.is_adjacent_tile(&e.position)
        })?;
        let ground_id = ground.id;
        let Some(mut picked) = ground.item.clone() else {
            return Err(ActionError::TargetNotFound(item.trim().to_string()));
        };
        let name = picked.name.clone();
        let single = picked.quantity();
        let found = !std::mem::take(&mut picked.dropped);

        let quantity = match self.sheet_mut(id)?.inventory.add(picked)? {
            AddOutcome::Stacked { quantity } => quantity,
            AddOutcome::Added => single,
        };
        self.state.scene.remove(ground_id);

        self.emit(GameEvent::ItemPickedUp {
            entity: id,
            item: name.clone(),
            quantity,
        });
        if found {
            self.record_quest(ObjectiveKind::Collect, &[name.as_str()]);
        }
        Ok(())
    }

    fn equip(&mut self, item: &str) -> Result<(), ActionError> {
        let id = self.player()?.id;
        let sheet = self.sheet_mut(id)?;
        let held = sheet
            .inventory
            .find(item)
            .ok_or_else(|| ActionError::ItemNotFound(item.trim().to_string()))?;
        if !held.is_equippable() {
            return Err(ActionError::NotEquippable(held.name.clone()));
        }

        let equipped = sheet.inventory.remove(item)?;
        let name = equipped.name.clone();
        let replaced = sheet
            .equipment
            .equip(equipped)
            .map_err(|rejected| ActionError::NotEquippable(rejected.name))?;
        let replaced_name = replaced.as_ref().map(|old| old.name.clone());
        if let Some(old) = replaced {
            sheet.inventory.add(old)?;
        }

        self.emit(GameEvent::ItemEquipped {
            entity: id,
            item: name,
            replaced: replaced_name,
        });
        Ok(())
    }

    fn drop_item(&mut self, item: &str) -> Result<(), ActionError> {
        let player = self.player()?;
        let (id, position) = (player.id, player.position);
        let mut dropped = self.sheet_mut(id)?.inventory.remove(item)?;
        dropped.dropped = true;
        let name = dropped.name.clone();

        let (x, y) = position.tile();
        self.state
            .scene
            .spawn(Entity::ground_item(dropped, Position::from_tile(x, y)));
        self.emit(GameEvent::ItemDropped {
            entity: id,
            item: name,
        });
        Ok(())
    }

    /// Visible entity that can take part in combat.
    fn combatant(&self, name: &str) -> Result<EntityId, ActionError> {
        let entity = self.find(name)?;
        if !entity.is_active_combatant() {
            return Err(ActionError::InvalidTarget(entity.name.clone()));
        }
        Ok(entity.id)
    }

    /// First entity named `name` that passes `in_reach`. Fails with
    /// `OutOfReach` when the name exists but every match is too far.
    fn nearest_named(
        &self,
        name: &str,
        in_reach: impl Fn(&Entity) -> bool,
    ) -> Result<&Entity, ActionError> {
        let mut matches = self.state.scene.named(name).peekable();
        let first = matches
            .peek()
            .map(|e| e.name.clone())
            .ok_or_else(|| ActionError::TargetNotFound(name.trim().to_string()))?;
        matches
            .find(|&e| in_reach(e))
            .ok_or(ActionError::OutOfReach(first))
    }
}

fn dialogue_line(node: &DialogueNode) -> GameEvent {
    GameEvent::DialogueLine {
        speaker: node.speaker.clone(),
        text: node.text.clone(),
        options: node.options.iter().map(|o| o.label.clone()).collect(),
    }
}
