//! Item definitions carried in inventories, equipment slots and on the ground.

use super::status::StatusKind;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub name: String,
    pub description: String,
    pub kind: ItemKind,
    /// Put down by the player; picking it back up is not a new find.
    #[cfg_attr(feature = "serde", serde(default))]
    pub dropped: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    Weapon { damage: u32, class: WeaponClass },
    Armor { defense: u32 },
    Consumable(Consumable),
    /// Keys, quest tokens and other inert objects.
    Misc,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WeaponClass {
    #[default]
    Melee,
    Ranged,
    Magic,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Consumable {
    pub effect: ConsumableEffect,
    pub quantity: u32,
}

/// What a consumable does to its target when used.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConsumableEffect {
    Heal(u32),
    RestoreMana(u32),
    ApplyStatus {
        kind: StatusKind,
        duration: f32,
        potency: f32,
    },
}

impl ConsumableEffect {
    /// Effects meant for someone other than the user.
    pub const fn is_offensive(&self) -> bool {
        matches!(self, ConsumableEffect::ApplyStatus { .. })
    }
}

impl Item {
    pub fn new(name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            kind,
            dropped: false,
        }
    }

    pub fn weapon(name: impl Into<String>, damage: u32) -> Self {
        Self::new(
            name,
            ItemKind::Weapon {
                damage,
                class: WeaponClass::Melee,
            },
        )
    }

    pub fn armor(name: impl Into<String>, defense: u32) -> Self {
        Self::new(name, ItemKind::Armor { defense })
    }

    pub fn consumable(name: impl Into<String>, effect: ConsumableEffect) -> Self {
        Self::new(
            name,
            ItemKind::Consumable(Consumable {
                effect,
                quantity: 1,
            }),
        )
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        if let ItemKind::Consumable(consumable) = &mut self.kind {
            consumable.quantity = quantity;
        }
        self
    }

    /// Case-insensitive name match.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    pub fn is_consumable(&self) -> bool {
        matches!(self.kind, ItemKind::Consumable(_))
    }

    pub fn is_equippable(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon { .. } | ItemKind::Armor { .. })
    }

    /// Stack size; non-consumables always count as one.
    pub fn quantity(&self) -> u32 {
        match &self.kind {
            ItemKind::Consumable(consumable) => consumable.quantity,
            _ => 1,
        }
    }

    pub fn weapon_damage(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Weapon { damage, .. } => Some(damage),
            _ => None,
        }
    }

    pub fn armor_defense(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Armor { defense } => Some(defense),
            _ => None,
        }
    }
}
