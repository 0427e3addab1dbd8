//! Experience and level-ups.

use crate::config::ExperienceCurve;
use crate::state::Entity;

/// What a call to [`gain_experience`] changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelReport {
    pub gained: u32,
    pub levels_gained: u32,
    pub level: u32,
    /// Abilities unlocked by this gain, in unlock order.
    pub unlocked: Vec<String>,
}

impl LevelReport {
    pub fn leveled_up(&self) -> bool {
        self.levels_gained > 0
    }
}

/// Adds experience to a character and resolves every level-up it pays for.
///
/// Each level consumes the current threshold, grows the next one by the
/// curve's factor, raises maximum health and attributes, and fully heals.
/// Abilities are unlocked once the final level is known. Entities without a
/// character sheet gain nothing.
pub fn gain_experience(entity: &mut Entity, amount: u32, curve: &ExperienceCurve) -> LevelReport {
    let Some(sheet) = entity.character.as_mut() else {
        return LevelReport::default();
    };

    sheet.experience = sheet.experience.saturating_add(amount);
    let mut levels_gained = 0;
    // A zero threshold would never be consumed.
    while sheet.next_level_at > 0 && sheet.experience >= sheet.next_level_at {
        sheet.experience -= sheet.next_level_at;
        sheet.level += 1;
        sheet.next_level_at = curve.next_threshold(sheet.next_level_at);
        levels_gained += 1;

        entity.health.raise_maximum(curve.health_per_level);
        entity.health.refill();
        entity.attributes.grow(curve.attributes_per_level);
    }

    let unlocked = sheet.abilities.unlock_up_to(sheet.level);
    LevelReport {
        gained: amount,
        levels_gained,
        level: sheet.level,
        unlocked,
    }
}
