//! In-memory SaveRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use rpg_core::SaveRecord;

use crate::repository::{
    RepositoryError, Result, SaveFormat, SaveHandle, SaveRepository, validate_slot,
};
use crate::utils::digest_hex;

/// In-memory implementation of SaveRepository.
///
/// Records are kept as decoded values; the digest is still computed over
/// their binary encoding so handles look like the file repository's.
#[derive(Default)]
pub struct InMemorySaveRepository {
    slots: RwLock<BTreeMap<String, (SaveHandle, SaveRecord)>>,
}

impl InMemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveRepository for InMemorySaveRepository {
    fn save(&self, slot: &str, record: &SaveRecord) -> Result<SaveHandle> {
        validate_slot(slot)?;
        let bytes = SaveFormat::Binary.encode(record)?;
        let handle = SaveHandle::new(slot, SaveFormat::Binary, digest_hex(&bytes), record);

        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.insert(slot.to_string(), (handle.clone(), record.clone()));
        Ok(handle)
    }

    fn load(&self, slot: &str) -> Result<Option<SaveRecord>> {
        validate_slot(slot)?;
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.get(slot).map(|(_, record)| record.clone()))
    }

    fn exists(&self, slot: &str) -> bool {
        self.slots
            .read()
            .map(|slots| slots.contains_key(slot))
            .unwrap_or(false)
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        slots.remove(slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<SaveHandle>> {
        let slots = self
            .slots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(slots.values().map(|(handle, _)| handle.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_core::{CharacterSheet, Entity, GameState, Position, Role, Scene};

    fn record() -> SaveRecord {
        let mut scene = Scene::new("Vault", 8, 8);
        let player = scene.spawn(
            Entity::builder("Aeron", Role::Player)
                .class("aeron")
                .at(Position::from_tile(2, 2))
                .character(CharacterSheet::default())
                .build(),
        );
        SaveRecord::capture(&GameState::new(scene, player, 11))
    }

    #[test]
    fn save_load_delete() {
        let repo = InMemorySaveRepository::new();
        let record = record();

        let handle = repo.save("slot1", &record).unwrap();
        assert_eq!(handle.scene, "Vault");
        assert_eq!(handle.digest.len(), 64);
        assert!(repo.exists("slot1"));
        assert_eq!(repo.load("slot1").unwrap(), Some(record));

        repo.delete("slot1").unwrap();
        assert!(!repo.exists("slot1"));
        assert_eq!(repo.load("slot1").unwrap(), None);
    }

    #[test]
    fn slots_are_listed_in_order() {
        let repo = InMemorySaveRepository::new();
        let record = record();
        repo.save("b", &record).unwrap();
        repo.save("a", &record).unwrap();

        let slots: Vec<_> = repo
            .list_slots()
            .unwrap()
            .into_iter()
            .map(|h| h.slot)
            .collect();
        assert_eq!(slots, vec!["a", "b"]);
    }

    #[test]
    fn invalid_slot_is_rejected() {
        let repo = InMemorySaveRepository::new();
        assert!(matches!(
            repo.save("no/slash", &record()),
            Err(RepositoryError::InvalidSlot(_))
        ));
    }
}
