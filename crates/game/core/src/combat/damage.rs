//! Damage calculation and application.

use crate::config::GameConfig;
use crate::state::Entity;

/// Result of applying damage to an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DamageReport {
    /// Health actually removed.
    pub dealt: u32,
    /// The hit brought health to zero.
    pub defeated: bool,
}

/// Damage before the defender's mitigation.
///
/// ```text
/// raw = weapon_damage + strength / 2
/// raw *= crit_multiplier   (on a critical)
/// ```
pub fn raw_damage(weapon_damage: u32, strength: u32, critical: bool, config: &GameConfig) -> u32 {
    let base = weapon_damage.saturating_add(strength / 2);
    if critical {
        base.saturating_mul(config.crit_multiplier)
    } else {
        base
    }
}

/// Removes `max(0, raw - defense)` health, or `raw` when `bypass_defense` is
/// set or the target has `armor_break`. Health is clamped at zero and an
/// entity reaching zero is marked defeated.
pub fn take_damage(target: &mut Entity, raw: u32, bypass_defense: bool) -> DamageReport {
    if target.is_defeated() {
        return DamageReport::default();
    }

    let defense = if bypass_defense { 0 } else { target.mitigation() };
    let dealt = target.health.drain(raw.saturating_sub(defense));
    let defeated = target.health.is_empty();
    if defeated {
        target.mark_defeated();
    }
    DamageReport { dealt, defeated }
}

/// Restores health up to the maximum. Defeated entities stay defeated.
pub fn heal(target: &mut Entity, amount: u32) -> u32 {
    if target.is_defeated() {
        return 0;
    }
    target.health.restore(amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Role, StatusKind};

    fn dummy(defense: u32) -> Entity {
        Entity::builder("Dummy", Role::Enemy)
            .health(50)
            .defense(defense)
            .build()
    }

    #[test]
    fn defense_reduces_damage() {
        let mut target = dummy(4);
        let report = take_damage(&mut target, 10, false);
        assert_eq!(report.dealt, 6);
        assert_eq!(target.health.current, 44);

        let report = take_damage(&mut target, 3, false);
        assert_eq!(report.dealt, 0);
        assert_eq!(target.health.current, 44);
    }

    #[test]
    fn armor_break_ignores_defense() {
        let mut target = dummy(4);
        target.status.apply(StatusKind::ArmorBreak, 10.0, 0.0);
        take_damage(&mut target, 10, false);
        assert_eq!(target.health.current, 40);
    }

    #[test]
    fn lethal_damage_clamps_and_defeats() {
        let mut target = dummy(0);
        let report = take_damage(&mut target, 500, false);
        assert_eq!(report, DamageReport { dealt: 50, defeated: true });
        assert_eq!(target.health.current, 0);
        assert!(target.is_defeated());

        assert_eq!(take_damage(&mut target, 5, false), DamageReport::default());
        assert_eq!(heal(&mut target, 10), 0);
    }

    #[test]
    fn raw_damage_adds_half_strength() {
        let config = GameConfig::default();
        assert_eq!(raw_damage(2, 10, false, &config), 7);
        assert_eq!(raw_damage(25, 11, true, &config), 60);
    }
}
