//! Structured player commands.

use crate::state::Direction;

/// One player command, already parsed from whatever input surface produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Intent {
    Move(Direction),
    Attack { target: String },
    /// Use an inventory item, on yourself unless a target is named.
    Use { item: String, target: Option<String> },
    /// Cast an unlocked ability, on yourself unless a target is named.
    Cast { ability: String, target: Option<String> },
    Examine { target: String },
    Talk { target: String },
    /// Pick dialogue option `index` (zero-based) in the active conversation.
    Choose { index: usize },
    Pickup { item: String },
    Equip { item: String },
    Drop { item: String },
    Wait,
}

impl Intent {
    /// Whether resolving this intent advances the world by one tick.
    pub const fn consumes_turn(&self) -> bool {
        !matches!(
            self,
            Intent::Examine { .. } | Intent::Talk { .. } | Intent::Choose { .. }
        )
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Intent::Move(_) => "move",
            Intent::Attack { .. } => "attack",
            Intent::Use { .. } => "use",
            Intent::Cast { .. } => "cast",
            Intent::Examine { .. } => "examine",
            Intent::Talk { .. } => "talk",
            Intent::Choose { .. } => "choose",
            Intent::Pickup { .. } => "pickup",
            Intent::Equip { .. } => "equip",
            Intent::Drop { .. } => "drop",
            Intent::Wait => "wait",
        }
    }
}
