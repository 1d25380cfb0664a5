//! JSON-file-backed loot store.
//!
//! One file per item instance under the base directory. Loot payloads are
//! small and written rarely (only on first open with unclaimed value), so
//! plain files beat a database here.

use std::path::PathBuf;

use world_core::{ItemGuid, LootPayload};

use super::{LootStore, StorageError};

/// Loot store persisting each payload as `loot_{guid}.json`.
pub struct FileLootStore {
    dir: PathBuf,
}

impl FileLootStore {
    /// Creates the store, creating the directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, item: ItemGuid) -> PathBuf {
        self.dir.join(format!("loot_{}.json", item.0))
    }
}

impl LootStore for FileLootStore {
    fn load(&self, item: ItemGuid) -> Result<Option<LootPayload>, StorageError> {
        let path = self.path(item);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)?;
        let payload = serde_json::from_str(&content)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Some(payload))
    }

    fn save(&self, item: ItemGuid, payload: &LootPayload) -> Result<(), StorageError> {
        let content = serde_json::to_string(payload)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        std::fs::write(self.path(item), content)?;
        Ok(())
    }

    fn delete(&self, item: ItemGuid) -> Result<(), StorageError> {
        let path = self.path(item);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use world_core::LootEntry;

    #[test]
    fn save_load_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileLootStore::new(dir.path().join("loot")).unwrap();

        let payload = LootPayload {
            money: 42,
            entries: vec![LootEntry {
                item_entry: 500,
                count: 2,
                taken: false,
            }],
        };

        assert!(store.load(ItemGuid(7)).unwrap().is_none());
        store.save(ItemGuid(7), &payload).unwrap();
        assert_eq!(store.load(ItemGuid(7)).unwrap(), Some(payload));
        store.delete(ItemGuid(7)).unwrap();
        assert!(store.load(ItemGuid(7)).unwrap().is_none());
    }
}
