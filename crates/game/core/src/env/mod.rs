//! Read-only collaborators of the engine.
//!
//! The engine never owns configuration, randomness or content. They are
//! borrowed through [`GameEnv`] so the runtime can swap implementations
//! (seeded PCG in play, fixed rolls in tests).
mod rng;

pub use rng::{FixedRng, PcgRng, RngOracle, RollContext, compute_seed};

use crate::config::GameConfig;
use crate::dialogue::DialogueTree;

/// Source of dialogue trees by id.
pub trait DialogueOracle: Send + Sync {
    fn tree(&self, id: &str) -> Option<DialogueTree>;
}

/// Oracle for scenes without any dialogue.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDialogue;

impl DialogueOracle for NoDialogue {
    fn tree(&self, _id: &str) -> Option<DialogueTree> {
        None
    }
}

#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    pub config: &'a GameConfig,
    pub rng: &'a dyn RngOracle,
    pub dialogues: &'a dyn DialogueOracle,
}

impl<'a> GameEnv<'a> {
    pub fn new(
        config: &'a GameConfig,
        rng: &'a dyn RngOracle,
        dialogues: &'a dyn DialogueOracle,
    ) -> Self {
        Self {
            config,
            rng,
            dialogues,
        }
    }
}
