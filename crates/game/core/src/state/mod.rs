//! Authoritative game state.
//!
//! The scene owns every entity; [`GameState`] adds the bookkeeping needed to
//! resolve turns deterministically. Runtime layers read this state freely but
//! mutate it only through [`crate::engine::GameEngine`].
pub mod types;

pub use types::*;

use crate::dialogue::DialogueManager;

/// Turn bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TurnState {
    /// World passes resolved so far.
    pub tick: Tick,
    /// Player commands executed so far; mixed into every random roll.
    pub nonce: u64,
    /// Seconds of game time elapsed.
    pub elapsed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GameOutcome {
    #[default]
    InProgress,
    Victory,
    Defeat,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    /// Seed for every random roll, combined with the nonce per roll.
    pub game_seed: u64,
    pub turn: TurnState,
    pub scene: Scene,
    pub player: EntityId,
    /// Conversation currently shown to the player.
    pub conversation: Option<DialogueManager>,
    pub outcome: GameOutcome,
}

impl GameState {
    pub fn new(scene: Scene, player: EntityId, game_seed: u64) -> Self {
        Self {
            game_seed,
            turn: TurnState::default(),
            scene,
            player,
            conversation: None,
            outcome: GameOutcome::InProgress,
        }
    }

    pub fn player(&self) -> Option<&Entity> {
        self.scene.get(self.player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Entity> {
        self.scene.get_mut(self.player)
    }

    pub fn is_over(&self) -> bool {
        self.outcome != GameOutcome::InProgress
    }
}
