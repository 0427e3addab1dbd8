/// Game configuration constants and tunable rule parameters.
///
/// Every number the combat resolver, AI and progression rules consult lives
/// here so content packs can rebalance a game without touching code.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Seconds of game time advanced by one tick.
    pub tick_seconds: f32,
    /// Damage dealt by an actor with no weapon and no natural damage override.
    pub unarmed_damage: u32,
    /// Percent chance an attack is evaded while the defender has `evasion`.
    pub evasion_chance: f32,
    /// Miss chance in percent before dexterity is applied.
    pub base_miss_chance: f32,
    /// Dexterity points per percent of miss chance removed.
    pub miss_dexterity_divisor: f32,
    /// Critical chance in percent before dexterity is applied.
    pub base_crit_chance: f32,
    /// Dexterity points per percent of critical chance gained.
    pub crit_dexterity_divisor: f32,
    pub crit_multiplier: u32,
    /// Distance below which a chasing enemy switches to attacking.
    pub attack_range: f32,
    pub default_aggro_range: f32,
    /// Movement multiplier while `slow` is active.
    pub slow_factor: f32,
    pub inventory_capacity: usize,
    pub experience: ExperienceCurve,
}

impl GameConfig {
    // ===== compile-time constants =====
    pub const MAX_ENTITIES: usize = 256;
    pub const MAX_ABILITIES: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_TICK_SECONDS: f32 = 1.0;
    pub const DEFAULT_UNARMED_DAMAGE: u32 = 2;
    pub const DEFAULT_EVASION_CHANCE: f32 = 50.0;
    pub const DEFAULT_ATTACK_RANGE: f32 = 1.0;
    pub const DEFAULT_AGGRO_RANGE: f32 = 10.0;
    pub const DEFAULT_INVENTORY_CAPACITY: usize = 10;

    pub fn new() -> Self {
        Self {
            tick_seconds: Self::DEFAULT_TICK_SECONDS,
            unarmed_damage: Self::DEFAULT_UNARMED_DAMAGE,
            evasion_chance: Self::DEFAULT_EVASION_CHANCE,
            base_miss_chance: 5.0,
            miss_dexterity_divisor: 4.0,
            base_crit_chance: 5.0,
            crit_dexterity_divisor: 2.0,
            crit_multiplier: 2,
            attack_range: Self::DEFAULT_ATTACK_RANGE,
            default_aggro_range: Self::DEFAULT_AGGRO_RANGE,
            slow_factor: 0.5,
            inventory_capacity: Self::DEFAULT_INVENTORY_CAPACITY,
            experience: ExperienceCurve::default(),
        }
    }

    /// Miss chance in percent for an attacker with the given dexterity.
    pub fn miss_chance(&self, dexterity: u32) -> f32 {
        (self.base_miss_chance - dexterity as f32 / self.miss_dexterity_divisor).max(0.0)
    }

    /// Critical chance in percent for an attacker with the given dexterity.
    pub fn crit_chance(&self, dexterity: u32) -> f32 {
        self.base_crit_chance + dexterity as f32 / self.crit_dexterity_divisor
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Experience thresholds and per-level growth.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExperienceCurve {
    /// Experience required to leave level 1.
    pub base_threshold: u32,
    /// Factor applied to the threshold after each level, truncated.
    pub growth: f32,
    pub health_per_level: u32,
    pub attributes_per_level: u32,
}

impl ExperienceCurve {
    pub fn next_threshold(&self, threshold: u32) -> u32 {
        ((threshold as f32) * self.growth) as u32
    }
}

impl Default for ExperienceCurve {
    fn default() -> Self {
        Self {
            base_threshold: 100,
            growth: 1.5,
            health_per_level: 10,
            attributes_per_level: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dexterity_scales_miss_and_crit() {
        let config = GameConfig::default();
        assert_eq!(config.miss_chance(10), 2.5);
        assert_eq!(config.miss_chance(40), 0.0);
        assert_eq!(config.crit_chance(10), 10.0);
    }

    #[test]
    fn threshold_growth_truncates() {
        let curve = ExperienceCurve::default();
        assert_eq!(curve.next_threshold(100), 150);
        assert_eq!(curve.next_threshold(150), 225);
        assert_eq!(curve.next_threshold(225), 337);
    }
}
