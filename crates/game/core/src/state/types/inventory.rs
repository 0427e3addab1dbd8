//! Bounded inventory with consumable stacking.

use super::item::{ConsumableEffect, Item, ItemKind};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryError {
    #[error("inventory is full ({capacity} items)")]
    Full { capacity: usize },

    #[error("no item named '{0}'")]
    NotFound(String),

    #[error("'{0}' cannot be used")]
    NotUsable(String),

    #[error("'{0}' cannot be equipped")]
    NotEquippable(String),
}

/// Result of adding an item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddOutcome {
    /// Merged into an existing stack, which now holds `quantity`.
    Stacked { quantity: u32 },
    Added,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    items: Vec<Item>,
    capacity: usize,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn find(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.is_named(name))
    }

    /// Adds an item. A consumable merges into an existing stack of the same
    /// name even when the inventory is at capacity.
    pub fn add(&mut self, item: Item) -> Result<AddOutcome, InventoryError> {
        if let ItemKind::Consumable(incoming) = &item.kind {
            let stack = self.items.iter_mut().find_map(|held| match &mut held.kind {
                ItemKind::Consumable(existing) if held.name.eq_ignore_ascii_case(&item.name) => {
                    Some(existing)
                }
                _ => None,
            });
            if let Some(existing) = stack {
                existing.quantity = existing.quantity.saturating_add(incoming.quantity);
                return Ok(AddOutcome::Stacked {
                    quantity: existing.quantity,
                });
            }
        }

        if self.is_full() {
            return Err(InventoryError::Full {
                capacity: self.capacity,
            });
        }
        self.items.push(item);
        Ok(AddOutcome::Added)
    }

    /// Removes the first item whose name matches case-insensitively.
    pub fn remove(&mut self, name: &str) -> Result<Item, InventoryError> {
        let index = self
            .items
            .iter()
            .position(|item| item.is_named(name))
            .ok_or_else(|| InventoryError::NotFound(name.to_string()))?;
        Ok(self.items.remove(index))
    }

    /// Checks that `name` refers to a usable consumable without consuming it.
    pub fn peek_consumable(&self, name: &str) -> Result<ConsumableEffect, InventoryError> {
        let item = self
            .find(name)
            .ok_or_else(|| InventoryError::NotFound(name.to_string()))?;
        match &item.kind {
            ItemKind::Consumable(consumable) => Ok(consumable.effect),
            _ => Err(InventoryError::NotUsable(item.name.clone())),
        }
    }

    /// Consumes one unit of a consumable, dropping the entry at zero.
    pub fn take_consumable(&mut self, name: &str) -> Result<ConsumableEffect, InventoryError> {
        let index = self
            .items
            .iter()
            .position(|item| item.is_named(name))
            .ok_or_else(|| InventoryError::NotFound(name.to_string()))?;

        let item = &mut self.items[index];
        let (effect, remaining) = match &mut item.kind {
            ItemKind::Consumable(consumable) => {
                consumable.quantity = consumable.quantity.saturating_sub(1);
                (consumable.effect, consumable.quantity)
            }
            _ => return Err(InventoryError::NotUsable(item.name.clone())),
        };

        if remaining == 0 {
            self.items.remove(index);
        }
        Ok(effect)
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new(crate::config::GameConfig::DEFAULT_INVENTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::types::status::StatusKind;

    fn dart() -> Item {
        Item::consumable(
            "Poison Dart",
            ConsumableEffect::ApplyStatus {
                kind: StatusKind::Poison,
                duration: 4.0,
                potency: 5.0,
            },
        )
    }

    #[test]
    fn consumables_stack_by_name() {
        let mut inventory = Inventory::new(4);
        assert_eq!(inventory.add(dart()), Ok(AddOutcome::Added));
        assert_eq!(
            inventory.add(dart()),
            Ok(AddOutcome::Stacked { quantity: 2 })
        );
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn capacity_rejects_new_entries_but_not_stacks() {
        let mut inventory = Inventory::new(1);
        inventory.add(dart()).unwrap();
        assert_eq!(
            inventory.add(Item::weapon("Sword", 10)),
            Err(InventoryError::Full { capacity: 1 })
        );
        assert!(inventory.add(dart()).is_ok());
    }

    #[test]
    fn using_last_unit_removes_entry() {
        let mut inventory = Inventory::new(4);
        inventory.add(dart().with_quantity(2)).unwrap();

        inventory.take_consumable("poison dart").unwrap();
        assert_eq!(inventory.find("Poison Dart").map(Item::quantity), Some(1));
        inventory.take_consumable("POISON DART").unwrap();
        assert!(inventory.is_empty());
    }

    #[test]
    fn non_consumables_cannot_be_used() {
        let mut inventory = Inventory::new(4);
        inventory.add(Item::weapon("Sword", 10)).unwrap();
        assert_eq!(
            inventory.take_consumable("sword"),
            Err(InventoryError::NotUsable("Sword".into()))
        );
        assert_eq!(
            inventory.take_consumable("axe"),
            Err(InventoryError::NotFound("axe".into()))
        );
        assert_eq!(inventory.len(), 1);
    }
}
