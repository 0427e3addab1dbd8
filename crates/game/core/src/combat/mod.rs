//! Combat resolution.
//!
//! Pure functions over entities: no scene access, no randomness of their own.
//! The engine draws the rolls and feeds them in, which keeps every formula
//! testable with exact numbers.
//!
//! - `resolve_attack`: evasion, miss, critical and damage in one call
//! - `take_damage`: defense and armor break, clamping and defeat
//! - `heal`: clamped restoration

pub mod damage;
pub mod hit;
pub mod result;

pub use damage::{DamageReport, heal, raw_damage, take_damage};
pub use hit::{AttackRolls, check_critical, check_evasion, check_miss};
pub use result::{AttackOutcome, AttackProfile, resolve_attack};
