//! In-memory store implementing every repository trait.
//!
//! Used by tests and local single-process deployments. One shared inner
//! state makes `commit_unwrap` genuinely transactional: the inventory write
//! and the gift deletion happen under one lock.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use world_core::{ActorId, Inventory, ItemGuid, LootPayload};

use super::{CharacterStore, GiftRecord, GiftRepository, LootStore, StorageError};

#[derive(Default)]
struct Inner {
    gifts: HashMap<ItemGuid, GiftRecord>,
    loot: HashMap<ItemGuid, LootPayload>,
    inventories: HashMap<ActorId, Inventory>,
}

/// Shared in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a gift record (test setup).
    pub fn insert_gift(&self, item: ItemGuid, record: GiftRecord) {
        self.inner
            .lock()
            .expect("memory store lock poisoned")
            .gifts
            .insert(item, record);
    }

    /// True while a gift record exists for the item.
    pub fn gift_exists(&self, item: ItemGuid) -> bool {
        self.inner
            .lock()
            .expect("memory store lock poisoned")
            .gifts
            .contains_key(&item)
    }

    /// Last committed inventory snapshot for an owner, if any.
    pub fn saved_inventory(&self, owner: ActorId) -> Option<Inventory> {
        self.inner
            .lock()
            .expect("memory store lock poisoned")
            .inventories
            .get(&owner)
            .cloned()
    }

    /// Stored loot payload for an item, if any.
    pub fn stored_loot(&self, item: ItemGuid) -> Option<LootPayload> {
        self.inner
            .lock()
            .expect("memory store lock poisoned")
            .loot
            .get(&item)
            .cloned()
    }
}

#[async_trait]
impl GiftRepository for MemoryStore {
    async fn load(&self, item: ItemGuid) -> Result<Option<GiftRecord>, StorageError> {
        Ok(self
            .inner
            .lock()
            .expect("memory store lock poisoned")
            .gifts
            .get(&item)
            .copied())
    }
}

impl LootStore for MemoryStore {
    fn load(&self, item: ItemGuid) -> Result<Option<LootPayload>, StorageError> {
        Ok(self
            .inner
            .lock()
            .expect("memory store lock poisoned")
            .loot
            .get(&item)
            .cloned())
    }

    fn save(&self, item: ItemGuid, payload: &LootPayload) -> Result<(), StorageError> {
        self.inner
            .lock()
            .expect("memory store lock poisoned")
            .loot
            .insert(item, payload.clone());
        Ok(())
    }

    fn delete(&self, item: ItemGuid) -> Result<(), StorageError> {
        self.inner
            .lock()
            .expect("memory store lock poisoned")
            .loot
            .remove(&item);
        Ok(())
    }
}

#[async_trait]
impl CharacterStore for MemoryStore {
    async fn commit_unwrap(
        &self,
        owner: ActorId,
        inventory: &Inventory,
        consumed_gift: ItemGuid,
    ) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().expect("memory store lock poisoned");
        inner.inventories.insert(owner, inventory.clone());
        inner.gifts.remove(&consumed_gift);
        Ok(())
    }
}
