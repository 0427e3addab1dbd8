//! Repository contract for saving and loading games.

use chrono::{DateTime, Utc};
use rpg_core::SaveRecord;
use serde::{Deserialize, Serialize};

use crate::repository::{RepositoryError, Result};

/// Encoding of a save payload.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SaveFormat {
    /// Compact bincode.
    #[default]
    Binary,
    /// Pretty-printed JSON, readable by hand.
    Json,
}

impl SaveFormat {
    pub const fn extension(self) -> &'static str {
        match self {
            SaveFormat::Binary => "sav",
            SaveFormat::Json => "json",
        }
    }

    pub fn encode(self, record: &SaveRecord) -> Result<Vec<u8>> {
        match self {
            SaveFormat::Binary => bincode::serialize(record)
                .map_err(|e| RepositoryError::Serialization(e.to_string())),
            SaveFormat::Json => {
                serde_json::to_vec_pretty(record).map_err(|e| RepositoryError::Json(e.to_string()))
            }
        }
    }

    pub fn decode(self, bytes: &[u8]) -> Result<SaveRecord> {
        match self {
            SaveFormat::Binary => bincode::deserialize(bytes)
                .map_err(|e| RepositoryError::Serialization(e.to_string())),
            SaveFormat::Json => {
                serde_json::from_slice(bytes).map_err(|e| RepositoryError::Json(e.to_string()))
            }
        }
    }
}

/// Receipt of a stored save, also used as slot metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveHandle {
    pub slot: String,
    pub format: SaveFormat,
    /// Hex SHA-256 of the encoded payload.
    pub digest: String,
    pub saved_at: DateTime<Utc>,
    pub scene: String,
    pub tick: u64,
}

impl SaveHandle {
    pub fn new(slot: &str, format: SaveFormat, digest: String, record: &SaveRecord) -> Self {
        Self {
            slot: slot.to_string(),
            format,
            digest,
            saved_at: Utc::now(),
            scene: record.scene.name.clone(),
            tick: record.tick,
        }
    }

    /// First 12 hex characters of the digest, for messages.
    pub fn short_digest(&self) -> &str {
        &self.digest[..self.digest.len().min(12)]
    }
}

/// Repository for saved games, keyed by slot name.
///
/// Slot names are restricted to ASCII letters, digits, `-` and `_` so they
/// map directly onto file names.
pub trait SaveRepository: Send + Sync {
    /// Store `record` under `slot`, replacing any previous save there.
    fn save(&self, slot: &str, record: &SaveRecord) -> Result<SaveHandle>;

    /// Load the record stored under `slot`.
    fn load(&self, slot: &str) -> Result<Option<SaveRecord>>;

    fn exists(&self, slot: &str) -> bool;

    fn delete(&self, slot: &str) -> Result<()>;

    /// Metadata of every stored slot, sorted by slot name.
    fn list_slots(&self) -> Result<Vec<SaveHandle>>;
}

/// Rejects slot names that are empty or contain anything but ASCII
/// alphanumerics, `-` and `_`.
pub fn validate_slot(slot: &str) -> Result<()> {
    let valid = !slot.is_empty()
        && slot.len() <= 64
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(RepositoryError::InvalidSlot(slot.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn slot_names_map_to_file_names() {
        assert!(validate_slot("slot_1").is_ok());
        assert!(validate_slot("autosave-2").is_ok());
        assert!(validate_slot("").is_err());
        assert!(validate_slot("../escape").is_err());
        assert!(validate_slot("with space").is_err());
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!(SaveFormat::from_str("JSON").unwrap(), SaveFormat::Json);
        assert_eq!(SaveFormat::from_str("binary").unwrap(), SaveFormat::Binary);
        assert_eq!(SaveFormat::Json.to_string(), "json");
    }
}
