//! Weapon and armor slots.
//!
//! Equipped items are owned by the slot, not the inventory. The resolver
//! reads weapon damage and armor defense from here.

use super::item::{Item, ItemKind};

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    pub weapon: Option<Item>,
    pub armor: Option<Item>,
}

impl Equipment {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> EquipmentBuilder {
        EquipmentBuilder::default()
    }

    /// Puts `item` into its slot and returns whatever occupied it.
    ///
    /// Items that are neither weapons nor armor are handed back unchanged
    /// as `Err`.
    pub fn equip(&mut self, item: Item) -> Result<Option<Item>, Item> {
        match item.kind {
            ItemKind::Weapon { .. } => Ok(self.weapon.replace(item)),
            ItemKind::Armor { .. } => Ok(self.armor.replace(item)),
            _ => Err(item),
        }
    }

    pub fn unequip_weapon(&mut self) -> Option<Item> {
        self.weapon.take()
    }

    pub fn unequip_armor(&mut self) -> Option<Item> {
        self.armor.take()
    }

    pub fn weapon_damage(&self) -> Option<u32> {
        self.weapon.as_ref().and_then(Item::weapon_damage)
    }

    pub fn armor_defense(&self) -> u32 {
        self.armor
            .as_ref()
            .and_then(Item::armor_defense)
            .unwrap_or(0)
    }
}

#[derive(Default)]
pub struct EquipmentBuilder {
    weapon: Option<Item>,
    armor: Option<Item>,
}

impl EquipmentBuilder {
    pub fn weapon(mut self, item: Item) -> Self {
        self.weapon = Some(item);
        self
    }

    pub fn armor(mut self, item: Item) -> Self {
        self.armor = Some(item);
        self
    }

    pub fn build(self) -> Equipment {
        Equipment {
            weapon: self.weapon,
            armor: self.armor,
        }
    }
}
