//! Turn resolution.
//!
//! [`GameEngine`] is the only writer of [`GameState`]. One call to
//! [`GameEngine::execute`] resolves a player intent and, when the intent
//! consumes the turn, runs the world pass: AI, status decay, resource
//! regeneration and outcome evaluation.
//!
//! A rejected intent restores the state captured before resolution, so
//! callers never observe a half-applied command.

mod errors;
mod resolve;
mod rewards;
mod world;

pub use errors::ExecuteError;

use crate::action::{ActionError, Intent};
use crate::combat::AttackRolls;
use crate::env::{GameEnv, RollContext, compute_seed};
use crate::error::ErrorContext;
use crate::events::GameEvent;
use crate::state::{CharacterSheet, Entity, EntityId, GameOutcome, GameState, Quest, Tick};

/// Everything one executed intent produced.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnOutcome {
    /// Events in the order they happened.
    pub events: Vec<GameEvent>,
    /// The world pass ran.
    pub consumed_turn: bool,
    /// Tick after resolution.
    pub tick: Tick,
    pub outcome: GameOutcome,
}

pub struct GameEngine<'a> {
    state: &'a mut GameState,
}

impl<'a> GameEngine<'a> {
    pub fn new(state: &'a mut GameState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &GameState {
        &*self.state
    }

    /// Resolves one player intent.
    ///
    /// Free intents (`examine`, `talk`, `choose`) resolve without advancing
    /// the world. A player under stun or sleep loses turn-consuming intents
    /// but the world pass still runs.
    pub fn execute(
        &mut self,
        env: GameEnv<'_>,
        intent: &Intent,
    ) -> Result<TurnOutcome, ExecuteError> {
        if self.state.is_over() {
            return Err(ExecuteError::GameOver(self.state.outcome));
        }

        let context = ErrorContext::new(self.state.turn.nonce).with_actor(self.state.player);
        let before = self.state.clone();

        let resolved = {
            let mut turn = Turn::new(&mut *self.state, env);
            turn.run(intent).map(|()| turn.events)
        };

        match resolved {
            Ok(events) => Ok(TurnOutcome {
                events,
                consumed_turn: intent.consumes_turn(),
                tick: self.state.turn.tick,
                outcome: self.state.outcome,
            }),
            Err(source) => {
                *self.state = before;
                Err(ExecuteError::action(intent.label(), source, context))
            }
        }
    }

    /// Accepts a quest into the player's journal.
    pub fn accept_quest(&mut self, quest: Quest) -> Result<(), ActionError> {
        let sheet = self
            .state
            .player_mut()
            .and_then(|p| p.character.as_mut())
            .ok_or(ActionError::NotACharacter)?;
        sheet.journal.accept(quest)?;
        Ok(())
    }
}

/// Working set of one executed intent.
struct Turn<'s, 'e> {
    state: &'s mut GameState,
    env: GameEnv<'e>,
    events: Vec<GameEvent>,
}

impl<'s, 'e> Turn<'s, 'e> {
    fn new(state: &'s mut GameState, env: GameEnv<'e>) -> Self {
        Self {
            state,
            env,
            events: Vec::new(),
        }
    }

    fn run(&mut self, intent: &Intent) -> Result<(), ActionError> {
        let player = self.player()?;
        let consumes = intent.consumes_turn();

        if consumes && player.status.is_incapacitated() {
            let id = player.id;
            self.emit(GameEvent::Incapacitated { entity: id });
        } else {
            self.resolve(intent)?;
        }

        self.state.turn.nonce += 1;
        if consumes {
            self.world_pass();
        }
        self.evaluate_outcome();
        Ok(())
    }

    fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn player(&self) -> Result<&Entity, ActionError> {
        let player = self.state.player().ok_or(ActionError::NotACharacter)?;
        if player.is_defeated() {
            return Err(ActionError::ActorDefeated(player.name.clone()));
        }
        Ok(player)
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, ActionError> {
        self.state
            .scene
            .get_mut(id)
            .ok_or_else(|| ActionError::TargetNotFound(id.to_string()))
    }

    fn sheet(&self, id: EntityId) -> Result<&CharacterSheet, ActionError> {
        self.state
            .scene
            .get(id)
            .and_then(|e| e.character.as_deref())
            .ok_or(ActionError::NotACharacter)
    }

    fn sheet_mut(&mut self, id: EntityId) -> Result<&mut CharacterSheet, ActionError> {
        self.state
            .scene
            .get_mut(id)
            .and_then(|e| e.character.as_deref_mut())
            .ok_or(ActionError::NotACharacter)
    }

    /// Visible entity named `name`.
    fn find(&self, name: &str) -> Result<&Entity, ActionError> {
        self.state
            .scene
            .find_by_name(name)
            .ok_or_else(|| ActionError::TargetNotFound(name.trim().to_string()))
    }

    /// Rolls for one attack by `actor`.
    ///
    /// The stream mixes the tick into the nonce so attacks made during the
    /// world pass differ from the player's attack of the same command.
    fn attack_rolls(&self, actor: EntityId) -> AttackRolls {
        let stream = (self.state.turn.tick.0 << 32) ^ self.state.turn.nonce;
        let roll = |context| {
            let seed = compute_seed(self.state.game_seed, stream, actor.0, context);
            self.env.rng.roll_percent(seed)
        };
        AttackRolls {
            evasion: roll(RollContext::Evasion),
            miss: roll(RollContext::Miss),
            critical: roll(RollContext::Critical),
        }
    }
}
