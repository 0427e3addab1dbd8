//! Attack resolution.

use crate::config::GameConfig;
use crate::state::{Entity, StatusKind};

use super::damage::{raw_damage, take_damage};
use super::hit::{AttackRolls, check_critical, check_evasion, check_miss};

/// Attacker numbers captured before the defender is borrowed mutably.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackProfile {
    pub weapon_damage: u32,
    pub strength: u32,
    pub dexterity: u32,
}

impl AttackProfile {
    pub fn of(attacker: &Entity) -> Self {
        Self {
            weapon_damage: attacker.weapon_damage(),
            strength: attacker.attributes.strength,
            dexterity: attacker.attributes.dexterity,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackOutcome {
    Evaded,
    Missed,
    Hit {
        damage: u32,
        critical: bool,
        defeated: bool,
    },
}

impl AttackOutcome {
    pub fn damage(&self) -> u32 {
        match self {
            AttackOutcome::Hit { damage, .. } => *damage,
            _ => 0,
        }
    }

    pub fn defeated(&self) -> bool {
        matches!(self, AttackOutcome::Hit { defeated: true, .. })
    }
}

/// Resolves one attack against `defender`.
///
/// Order: evasion (only while the defender has `evasion`), miss, critical,
/// then damage through [`take_damage`]. Evades and misses leave the defender
/// untouched.
pub fn resolve_attack(
    attacker: &AttackProfile,
    defender: &mut Entity,
    rolls: AttackRolls,
    config: &GameConfig,
) -> AttackOutcome {
    if check_evasion(defender.status.has(StatusKind::Evasion), rolls.evasion, config) {
        return AttackOutcome::Evaded;
    }
    if check_miss(attacker.dexterity, rolls.miss, config) {
        return AttackOutcome::Missed;
    }

    let critical = check_critical(attacker.dexterity, rolls.critical, config);
    let raw = raw_damage(attacker.weapon_damage, attacker.strength, critical, config);
    let report = take_damage(defender, raw, false);
    AttackOutcome::Hit {
        damage: report.dealt,
        critical,
        defeated: report.defeated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Attributes, Role};

    fn hero() -> AttackProfile {
        AttackProfile {
            weapon_damage: 2,
            strength: 10,
            dexterity: 10,
        }
    }

    fn troll() -> Entity {
        Entity::builder("Troll", Role::Enemy)
            .health(150)
            .defense(1)
            .attributes(Attributes::new(0, 0, 0))
            .build()
    }

    #[test]
    fn unarmed_hit_uses_strength() {
        let config = GameConfig::default();
        let mut target = troll();
        let outcome = resolve_attack(&hero(), &mut target, AttackRolls::CLEAN_HIT, &config);
        assert_eq!(
            outcome,
            AttackOutcome::Hit {
                damage: 6,
                critical: false,
                defeated: false
            }
        );
        assert_eq!(target.health.current, 144);
    }

    #[test]
    fn critical_doubles_before_defense() {
        let config = GameConfig::default();
        let mut target = troll();
        let rolls = AttackRolls {
            critical: 0.0,
            ..AttackRolls::CLEAN_HIT
        };
        let outcome = resolve_attack(&hero(), &mut target, rolls, &config);
        assert_eq!(outcome.damage(), 13);
    }

    #[test]
    fn evasion_cancels_attack() {
        let config = GameConfig::default();
        let mut target = troll();
        target.status.apply(StatusKind::Evasion, 5.0, 0.0);
        let rolls = AttackRolls {
            evasion: 10.0,
            ..AttackRolls::CLEAN_HIT
        };
        assert_eq!(
            resolve_attack(&hero(), &mut target, rolls, &config),
            AttackOutcome::Evaded
        );
        assert_eq!(target.health.current, 150);

        let rolls = AttackRolls {
            evasion: 60.0,
            ..AttackRolls::CLEAN_HIT
        };
        assert!(matches!(
            resolve_attack(&hero(), &mut target, rolls, &config),
            AttackOutcome::Hit { .. }
        ));
    }

    #[test]
    fn low_roll_misses() {
        let config = GameConfig::default();
        let mut target = troll();
        let rolls = AttackRolls {
            miss: 1.0,
            ..AttackRolls::CLEAN_HIT
        };
        assert_eq!(
            resolve_attack(&hero(), &mut target, rolls, &config),
            AttackOutcome::Missed
        );
    }
}
