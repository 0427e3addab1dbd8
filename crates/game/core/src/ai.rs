//! Enemy decision state machine.
//!
//! A [`Brain`] moves through `Idle → Chasing → Attacking`, switching back
//! from `Attacking` to `Chasing` when the target steps out of reach. Once an
//! enemy has noticed its target it never returns to `Idle`.
//!
//! The brain only decides. Moving and attacking are carried out by the engine
//! so the rules for movement speed and combat stay in one place.

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiState {
    #[default]
    Idle,
    Chasing,
    Attacking,
}

/// What the entity should do this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiDecision {
    Hold,
    Advance,
    Strike,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Brain {
    pub state: AiState,
    /// Distance below which an idle entity starts chasing.
    pub aggro_range: f32,
}

impl Brain {
    pub fn new(aggro_range: f32) -> Self {
        Self {
            state: AiState::Idle,
            aggro_range,
        }
    }

    /// Next state for a target `distance` away.
    pub fn transition(&self, distance: f32, attack_range: f32) -> AiState {
        match self.state {
            AiState::Idle if distance < self.aggro_range => AiState::Chasing,
            AiState::Idle => AiState::Idle,
            AiState::Chasing if distance < attack_range => AiState::Attacking,
            AiState::Chasing => AiState::Chasing,
            AiState::Attacking if distance >= attack_range => AiState::Chasing,
            AiState::Attacking => AiState::Attacking,
        }
    }

    /// Applies one transition and returns the previous state together with
    /// the action for the resulting state.
    pub fn think(&mut self, distance: f32, attack_range: f32) -> (AiState, AiDecision) {
        let previous = self.state;
        self.state = self.transition(distance, attack_range);
        let decision = match self.state {
            AiState::Idle => AiDecision::Hold,
            AiState::Chasing => AiDecision::Advance,
            AiState::Attacking => AiDecision::Strike,
        };
        (previous, decision)
    }
}

impl Default for Brain {
    fn default() -> Self {
        Self::new(crate::config::GameConfig::DEFAULT_AGGRO_RANGE)
    }
}
