//! Character sheet: the component that makes an entity a playable or
//! progression-capable character.

use super::abilities::{AbilityBook, ResourceKind};
use super::equipment::Equipment;
use super::inventory::Inventory;
use super::quest::QuestJournal;

/// Regenerating pool clamped to `[0, maximum]`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourcePool {
    pub current: f32,
    pub maximum: f32,
    /// Points restored per second of game time.
    pub regen_per_second: f32,
}

impl ResourcePool {
    pub fn new(maximum: f32, regen_per_second: f32) -> Self {
        Self {
            current: maximum,
            maximum,
            regen_per_second,
        }
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost as f32
    }

    /// Deducts `cost` if affordable.
    pub fn spend(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.current -= cost as f32;
        true
    }

    pub fn restore(&mut self, amount: f32) -> f32 {
        let before = self.current;
        self.current = (self.current + amount).clamp(0.0, self.maximum);
        self.current - before
    }

    pub fn regenerate(&mut self, delta: f32) -> f32 {
        self.restore(self.regen_per_second * delta)
    }

    /// Whole points for display.
    pub fn whole(&self) -> u32 {
        self.current.floor() as u32
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSheet {
    pub level: u32,
    pub experience: u32,
    /// Experience needed for the next level.
    pub next_level_at: u32,
    pub mana: ResourcePool,
    pub stamina: ResourcePool,
    pub abilities: AbilityBook,
    pub inventory: Inventory,
    pub equipment: Equipment,
    pub journal: QuestJournal,
}

impl CharacterSheet {
    pub const DEFAULT_MANA: f32 = 100.0;
    pub const DEFAULT_MANA_REGEN: f32 = 1.5;
    pub const DEFAULT_STAMINA: f32 = 50.0;
    pub const DEFAULT_STAMINA_REGEN: f32 = 2.0;

    pub fn new(first_threshold: u32, inventory_capacity: usize) -> Self {
        Self {
            level: 1,
            experience: 0,
            next_level_at: first_threshold,
            mana: ResourcePool::new(Self::DEFAULT_MANA, Self::DEFAULT_MANA_REGEN),
            stamina: ResourcePool::new(Self::DEFAULT_STAMINA, Self::DEFAULT_STAMINA_REGEN),
            abilities: AbilityBook::default(),
            inventory: Inventory::new(inventory_capacity),
            equipment: Equipment::empty(),
            journal: QuestJournal::default(),
        }
    }

    #[must_use]
    pub fn with_abilities(mut self, abilities: AbilityBook) -> Self {
        self.abilities = abilities;
        self
    }

    pub fn pool(&self, kind: ResourceKind) -> &ResourcePool {
        match kind {
            ResourceKind::Mana => &self.mana,
            ResourceKind::Stamina => &self.stamina,
        }
    }

    pub fn pool_mut(&mut self, kind: ResourceKind) -> &mut ResourcePool {
        match kind {
            ResourceKind::Mana => &mut self.mana,
            ResourceKind::Stamina => &mut self.stamina,
        }
    }

    pub fn regenerate(&mut self, delta: f32) {
        self.mana.regenerate(delta);
        self.stamina.regenerate(delta);
    }
}

impl Default for CharacterSheet {
    fn default() -> Self {
        Self::new(100, crate::config::GameConfig::DEFAULT_INVENTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_regenerates_without_overflow() {
        let mut mana = ResourcePool::new(100.0, 1.5);
        assert!(mana.spend(20));
        mana.regenerate(2.0);
        assert_eq!(mana.current, 83.0);
        mana.regenerate(100.0);
        assert_eq!(mana.current, 100.0);
    }

    #[test]
    fn spend_refuses_when_short() {
        let mut stamina = ResourcePool::new(5.0, 0.0);
        assert!(!stamina.spend(10));
        assert_eq!(stamina.current, 5.0);
    }
}
