//! Runtime wrappers around static game content.
//!
//! [`OracleManager`] bundles the read-only collaborators the engine borrows
//! through [`rpg_core::GameEnv`]: rule configuration, the roll source and
//! the dialogue library. The data is immutable at runtime; dynamic state
//! lives in [`rpg_core::GameState`] and in save repositories.
mod dialogue;

use std::sync::Arc;

use rpg_content::ContentCatalog;
use rpg_core::{GameConfig, GameEnv, PcgRng, RngOracle};

pub use dialogue::DialogueLibrary;

/// Manages all oracle implementations and provides unified access
#[derive(Clone)]
pub struct OracleManager {
    pub(crate) config: Arc<GameConfig>,
    pub(crate) rng: Arc<dyn RngOracle>,
    pub(crate) dialogues: Arc<DialogueLibrary>,
}

impl OracleManager {
    /// Creates a new oracle manager rolling with [`PcgRng`].
    pub fn new(config: GameConfig, dialogues: DialogueLibrary) -> Self {
        Self {
            config: Arc::new(config),
            rng: Arc::new(PcgRng),
            dialogues: Arc::new(dialogues),
        }
    }

    /// Oracles over a loaded content catalog.
    pub fn from_catalog(catalog: &ContentCatalog) -> Self {
        Self::new(
            catalog.config.clone(),
            DialogueLibrary::new(catalog.dialogues.iter().cloned()),
        )
    }

    /// Replaces the roll source, e.g. with a fixed one in tests.
    pub fn with_rng(mut self, rng: impl RngOracle + 'static) -> Self {
        self.rng = Arc::new(rng);
        self
    }

    /// Converts oracle manager into GameEnv for rpg-core
    pub fn as_game_env(&self) -> GameEnv<'_> {
        GameEnv::new(
            self.config.as_ref(),
            self.rng.as_ref(),
            self.dialogues.as_ref(),
        )
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn dialogues(&self) -> &DialogueLibrary {
        &self.dialogues
    }
}

impl Default for OracleManager {
    fn default() -> Self {
        Self::new(GameConfig::default(), DialogueLibrary::default())
    }
}
