//! Castable abilities and the per-character ability book.

use super::status::StatusKind;

/// Resource pool an ability draws from.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResourceKind {
    #[default]
    Mana,
    Stamina,
}

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbilityEffect {
    Damage(u32),
    Heal(u32),
    ApplyStatus {
        kind: StatusKind,
        duration: f32,
        potency: f32,
    },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ability {
    pub name: String,
    pub description: String,
    pub cost: u32,
    pub cost_type: ResourceKind,
    pub required_level: u32,
    pub effect: AbilityEffect,
    /// Second effect on the same target, applied after `effect`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub follow_up: Option<AbilityEffect>,
}

impl Ability {
    pub fn new(name: impl Into<String>, cost: u32, required_level: u32, effect: AbilityEffect) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            cost,
            cost_type: ResourceKind::Mana,
            required_level,
            effect,
            follow_up: None,
        }
    }

    #[must_use]
    pub fn with_follow_up(mut self, effect: AbilityEffect) -> Self {
        self.follow_up = Some(effect);
        self
    }

    /// `effect`, then `follow_up` when present.
    pub fn effects(&self) -> impl Iterator<Item = AbilityEffect> {
        std::iter::once(self.effect).chain(self.follow_up)
    }

    #[must_use]
    pub fn with_cost_type(mut self, cost_type: ResourceKind) -> Self {
        self.cost_type = cost_type;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }
}

/// Abilities a character can learn, and which of them are unlocked.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityBook {
    learnable: Vec<Ability>,
    unlocked: Vec<String>,
}

impl AbilityBook {
    pub fn new(learnable: Vec<Ability>) -> Self {
        Self {
            learnable,
            unlocked: Vec::new(),
        }
    }

    pub fn learnable(&self) -> &[Ability] {
        &self.learnable
    }

    pub fn unlocked_names(&self) -> &[String] {
        &self.unlocked
    }

    pub fn is_unlocked(&self, name: &str) -> bool {
        self.unlocked.iter().any(|n| n.eq_ignore_ascii_case(name.trim()))
    }

    /// Looks up an unlocked ability by name.
    pub fn get(&self, name: &str) -> Option<&Ability> {
        if !self.is_unlocked(name) {
            return None;
        }
        self.learnable.iter().find(|a| a.is_named(name))
    }

    pub fn unlocked(&self) -> impl Iterator<Item = &Ability> {
        self.learnable
            .iter()
            .filter(|a| self.unlocked.iter().any(|n| a.is_named(n)))
    }

    /// Unlocks every ability whose required level is at most `level`.
    ///
    /// Idempotent; returns only the names that were newly unlocked.
    pub fn unlock_up_to(&mut self, level: u32) -> Vec<String> {
        let newly: Vec<String> = self
            .learnable
            .iter()
            .filter(|a| a.required_level <= level)
            .filter(|a| !self.unlocked.iter().any(|n| a.is_named(n)))
            .map(|a| a.name.clone())
            .collect();
        self.unlocked.extend(newly.iter().cloned());
        newly
    }

    /// Marks an ability as unlocked without a level check, used when
    /// restoring saved characters.
    pub fn force_unlock(&mut self, name: &str) {
        if !self.is_unlocked(name) {
            self.unlocked.push(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> AbilityBook {
        AbilityBook::new(vec![
            Ability::new("Power Strike", 10, 3, AbilityEffect::Damage(25))
                .with_cost_type(ResourceKind::Stamina),
            Ability::new("Fireball", 20, 5, AbilityEffect::Damage(40)),
        ])
    }

    #[test]
    fn unlocking_is_idempotent() {
        let mut book = book();
        assert!(book.unlock_up_to(2).is_empty());
        assert_eq!(book.unlock_up_to(3), vec!["Power Strike".to_string()]);
        assert!(book.unlock_up_to(3).is_empty());
        assert_eq!(book.unlocked_names().len(), 1);
    }

    #[test]
    fn locked_abilities_are_not_castable() {
        let mut book = book();
        book.unlock_up_to(3);
        assert!(book.get("power strike").is_some());
        assert!(book.get("fireball").is_none());
    }
}
