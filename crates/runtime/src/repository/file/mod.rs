//! File-based SaveRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use rpg_core::SaveRecord;

use crate::repository::{
    RepositoryError, Result, SaveFormat, SaveHandle, SaveRepository, validate_slot,
};
use crate::utils::digest_hex;

/// File-based implementation of SaveRepository.
///
/// # File Format
///
/// Each slot is two files in the base directory:
/// - `{slot}.sav` (bincode) or `{slot}.json` (JSON) holding the record
/// - `{slot}.meta.json` holding the [`SaveHandle`], including the SHA-256
///   of the payload
///
/// Both are written to a temp file first and renamed into place. Loading
/// recomputes the digest and rejects payloads that no longer match.
pub struct FileSaveRepository {
    base_dir: PathBuf,
    format: SaveFormat,
}

const META_SUFFIX: &str = ".meta.json";

impl FileSaveRepository {
    /// Create a new file-based save repository.
    pub fn new(base_dir: impl AsRef<Path>, format: SaveFormat) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(RepositoryError::Io)?;
        Ok(Self { base_dir, format })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn format(&self) -> SaveFormat {
        self.format
    }

    fn payload_path(&self, slot: &str, format: SaveFormat) -> PathBuf {
        self.base_dir
            .join(format!("{}.{}", slot, format.extension()))
    }

    fn meta_path(&self, slot: &str) -> PathBuf {
        self.base_dir.join(format!("{}{}", slot, META_SUFFIX))
    }

    fn read_meta(&self, slot: &str) -> Result<Option<SaveHandle>> {
        let path = self.meta_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;
        let handle = serde_json::from_slice(&bytes)
            .map_err(|e| RepositoryError::CorruptedData(format!("{}: {}", path.display(), e)))?;
        Ok(Some(handle))
    }
}

/// Writes to `{path}.tmp`, then renames over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    fs::write(&temp, bytes).map_err(RepositoryError::Io)?;
    fs::rename(&temp, path).map_err(RepositoryError::Io)?;
    Ok(())
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, slot: &str, record: &SaveRecord) -> Result<SaveHandle> {
        validate_slot(slot)?;

        let bytes = self.format.encode(record)?;
        let handle = SaveHandle::new(slot, self.format, digest_hex(&bytes), record);
        let meta = serde_json::to_vec_pretty(&handle)
            .map_err(|e| RepositoryError::Json(e.to_string()))?;

        // A slot switching format would leave the old payload behind.
        if let Some(previous) = self.read_meta(slot)?
            && previous.format != self.format
        {
            let stale = self.payload_path(slot, previous.format);
            if stale.exists() {
                fs::remove_file(&stale).map_err(RepositoryError::Io)?;
            }
        }

        let path = self.payload_path(slot, self.format);
        write_atomic(&path, &bytes)?;
        write_atomic(&self.meta_path(slot), &meta)?;

        tracing::debug!(
            "Saved slot '{}' to {} ({})",
            slot,
            path.display(),
            handle.short_digest()
        );
        Ok(handle)
    }

    fn load(&self, slot: &str) -> Result<Option<SaveRecord>> {
        validate_slot(slot)?;
        let Some(handle) = self.read_meta(slot)? else {
            return Ok(None);
        };

        let path = self.payload_path(slot, handle.format);
        if !path.exists() {
            return Err(RepositoryError::CorruptedData(format!(
                "slot '{}' has metadata but no payload at {}",
                slot,
                path.display()
            )));
        }
        let bytes = fs::read(&path).map_err(RepositoryError::Io)?;

        let actual = digest_hex(&bytes);
        if actual != handle.digest {
            return Err(RepositoryError::DigestMismatch {
                slot: slot.to_string(),
                expected: handle.digest,
                actual,
            });
        }
        let record = handle.format.decode(&bytes)?;

        tracing::debug!("Loaded slot '{}' from {}", slot, path.display());
        Ok(Some(record))
    }

    fn exists(&self, slot: &str) -> bool {
        validate_slot(slot).is_ok() && self.meta_path(slot).exists()
    }

    fn delete(&self, slot: &str) -> Result<()> {
        validate_slot(slot)?;
        let paths = [
            self.payload_path(slot, SaveFormat::Binary),
            self.payload_path(slot, SaveFormat::Json),
            self.meta_path(slot),
        ];
        for path in paths.iter().filter(|p| p.exists()) {
            fs::remove_file(path).map_err(RepositoryError::Io)?;
        }
        tracing::debug!("Deleted slot '{}'", slot);
        Ok(())
    }

    fn list_slots(&self) -> Result<Vec<SaveHandle>> {
        let mut handles = Vec::new();

        let entries = fs::read_dir(&self.base_dir).map_err(RepositoryError::Io)?;
        for entry in entries {
            let entry = entry.map_err(RepositoryError::Io)?;
            let path = entry.path();

            let Some(slot) = path
                .file_name()
                .and_then(|s| s.to_str())
                .and_then(|name| name.strip_suffix(META_SUFFIX))
            else {
                continue;
            };
            match self.read_meta(slot) {
                Ok(Some(handle)) => handles.push(handle),
                Ok(None) => {}
                Err(e) => tracing::warn!("Skipping unreadable save metadata {}: {}", path.display(), e),
            }
        }

        handles.sort_by(|a, b| a.slot.cmp(&b.slot));
        Ok(handles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpg_core::{
        Brain, CharacterSheet, Entity, GameState, Item, Position, Role, Scene, StatusKind,
    };

    fn record() -> SaveRecord {
        let mut scene = Scene::new("Aethelgard", 40, 10);
        let mut player = Entity::builder("Aeron", Role::Player)
            .class("aeron")
            .at(Position::from_tile(5, 5))
            .character(CharacterSheet::default())
            .build();
        player.status.apply(StatusKind::Poison, 3.0, 5.0);
        let player = scene.spawn(player);
        scene.spawn(
            Entity::builder("Kane", Role::Enemy)
                .class("kane")
                .at(Position::new(9.5, 5.0))
                .health(250)
                .brain(Brain::new(10.0))
                .build(),
        );
        scene.spawn(Entity::ground_item(
            Item::weapon("Valiant Sword", 25),
            Position::from_tile(6, 5),
        ));
        SaveRecord::capture(&GameState::new(scene, player, 42))
    }

    #[test]
    fn round_trips_in_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let record = record();

        for format in [SaveFormat::Binary, SaveFormat::Json] {
            let repo = FileSaveRepository::new(dir.path(), format).unwrap();
            let handle = repo.save("quick", &record).unwrap();
            assert_eq!(handle.format, format);
            assert!(dir.path().join(format!("quick.{}", format.extension())).exists());
            assert_eq!(repo.load("quick").unwrap(), Some(record.clone()));
        }
        // Switching format removed the old payload.
        assert!(!dir.path().join("quick.sav").exists());
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path(), SaveFormat::Json).unwrap();
        repo.save("slot1", &record()).unwrap();

        let path = dir.path().join("slot1.json");
        let text = fs::read_to_string(&path).unwrap();
        fs::write(&path, text.replacen("Aeron", "Noera", 1)).unwrap();

        assert!(matches!(
            repo.load("slot1"),
            Err(RepositoryError::DigestMismatch { .. })
        ));
    }

    #[test]
    fn missing_slot_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path(), SaveFormat::Binary).unwrap();
        assert_eq!(repo.load("nothing").unwrap(), None);
        assert!(!repo.exists("nothing"));
    }

    #[test]
    fn list_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path(), SaveFormat::Binary).unwrap();
        let record = record();
        repo.save("beta", &record).unwrap();
        repo.save("alpha", &record).unwrap();

        let slots = repo.list_slots().unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].slot, "alpha");
        assert_eq!(slots[0].scene, "Aethelgard");

        repo.delete("alpha").unwrap();
        assert!(!repo.exists("alpha"));
        assert!(!dir.path().join("alpha.sav").exists());
        assert_eq!(repo.list_slots().unwrap().len(), 1);
    }
}
