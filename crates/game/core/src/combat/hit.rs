//! Evasion, miss and critical checks.
//!
//! Every check compares a percentage roll in `[0, 100)` against a chance; the
//! check succeeds when the roll is strictly below the chance.

use crate::config::GameConfig;

/// The three rolls consumed by one attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackRolls {
    pub evasion: f32,
    pub miss: f32,
    pub critical: f32,
}

impl AttackRolls {
    /// Rolls that never evade, never miss and never crit.
    pub const CLEAN_HIT: Self = Self {
        evasion: 99.99,
        miss: 99.99,
        critical: 99.99,
    };
}

/// True when a defender under `evasion` dodges the attack.
pub fn check_evasion(defender_evading: bool, roll: f32, config: &GameConfig) -> bool {
    defender_evading && roll < config.evasion_chance
}

pub fn check_miss(dexterity: u32, roll: f32, config: &GameConfig) -> bool {
    roll < config.miss_chance(dexterity)
}

pub fn check_critical(dexterity: u32, roll: f32, config: &GameConfig) -> bool {
    roll < config.crit_chance(dexterity)
}
