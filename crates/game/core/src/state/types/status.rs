//! Status effect table.
//!
//! Effects carry a remaining duration in seconds of game time and a potency.
//! Each tick decrements every effect by the tick delta; an effect whose
//! duration reaches zero still produces its consequence for that tick and is
//! removed afterwards. Reapplying an effect overwrites it in place.
//!
//! Iteration order is insertion order so periodic damage is reported in a
//! stable sequence.

use arrayvec::ArrayVec;
use strum::EnumCount;

/// One slot per kind; the table never holds duplicates.
pub const MAX_STATUS_EFFECTS: usize = StatusKind::COUNT;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::Display,
    strum::AsRefStr,
    strum::EnumCount,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StatusKind {
    /// Loses `potency` health per second, ignoring defense.
    Poison,
    /// Cannot act.
    Stun,
    /// Moves at reduced speed.
    Slow,
    /// Cannot act.
    Sleep,
    /// Incoming attacks may be evaded.
    Evasion,
    /// Defense is ignored when taking hits.
    ArmorBreak,
    Confusion,
}

impl StatusKind {
    /// Kinds that prevent the bearer from acting.
    pub const fn incapacitates(self) -> bool {
        matches!(self, StatusKind::Stun | StatusKind::Sleep)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Seconds of game time left.
    pub remaining: f32,
    pub potency: f32,
}

/// Health loss produced by a periodic effect during one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodicDamage {
    pub kind: StatusKind,
    pub amount: u32,
}

/// Outcome of decaying a status table by one tick.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusTick {
    /// Stun or sleep was active when the tick started.
    pub incapacitated: bool,
    pub periodic: ArrayVec<PeriodicDamage, MAX_STATUS_EFFECTS>,
    pub expired: ArrayVec<StatusKind, MAX_STATUS_EFFECTS>,
}

impl StatusTick {
    pub fn total_damage(&self) -> u32 {
        self.periodic.iter().map(|p| p.amount).sum()
    }
}

/// Active status effects of one entity.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, MAX_STATUS_EFFECTS>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets or overwrites the effect of `kind`.
    pub fn apply(&mut self, kind: StatusKind, duration: f32, potency: f32) {
        let effect = StatusEffect {
            kind,
            remaining: duration,
            potency,
        };
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            *existing = effect;
        } else {
            // Capacity equals the number of kinds, so a missing kind always fits.
            self.effects.push(effect);
        }
    }

    pub fn has(&self, kind: StatusKind) -> bool {
        self.effects.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: StatusKind) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn remove(&mut self, kind: StatusKind) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| e.kind == kind)?;
        Some(self.effects.remove(index))
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }

    pub fn is_incapacitated(&self) -> bool {
        self.effects.iter().any(|e| e.kind.incapacitates())
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Decays every effect by `delta` seconds.
    ///
    /// Periodic effects report their damage for this tick; the caller applies
    /// it. Effects at or below zero remaining are removed after reporting.
    pub fn tick(&mut self, delta: f32) -> StatusTick {
        let mut report = StatusTick {
            incapacitated: self.is_incapacitated(),
            ..StatusTick::default()
        };

        for effect in self.effects.iter_mut() {
            if effect.kind == StatusKind::Poison {
                let amount = (effect.potency * delta).round().max(0.0) as u32;
                report.periodic.push(PeriodicDamage {
                    kind: effect.kind,
                    amount,
                });
            }
            effect.remaining -= delta;
            if effect.remaining <= 0.0 {
                report.expired.push(effect.kind);
            }
        }

        self.effects.retain(|e| e.remaining > 0.0);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poison_deals_potency_each_tick_then_expires() {
        let mut status = StatusEffects::empty();
        status.apply(StatusKind::Poison, 3.0, 5.0);

        let mut total = 0;
        for _ in 0..3 {
            total += status.tick(1.0).total_damage();
        }

        assert_eq!(total, 15);
        assert!(!status.has(StatusKind::Poison));
    }

    #[test]
    fn reapply_overwrites_in_place() {
        let mut status = StatusEffects::empty();
        status.apply(StatusKind::Slow, 8.0, 0.0);
        status.apply(StatusKind::Poison, 4.0, 5.0);
        status.apply(StatusKind::Slow, 2.0, 0.0);

        let kinds: Vec<_> = status.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![StatusKind::Slow, StatusKind::Poison]);
        assert_eq!(status.get(StatusKind::Slow).map(|e| e.remaining), Some(2.0));
    }

    #[test]
    fn incapacitation_is_reported_before_decay() {
        let mut status = StatusEffects::empty();
        status.apply(StatusKind::Stun, 1.0, 0.0);

        let report = status.tick(1.0);
        assert!(report.incapacitated);
        assert_eq!(report.expired.as_slice(), &[StatusKind::Stun]);
        assert!(!status.is_incapacitated());
    }

    #[test]
    fn names_are_snake_case() {
        assert_eq!(StatusKind::ArmorBreak.as_ref(), "armor_break");
        assert_eq!("ARMOR_BREAK".parse::<StatusKind>().ok(), Some(StatusKind::ArmorBreak));
    }
}
