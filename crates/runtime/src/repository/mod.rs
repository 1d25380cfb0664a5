//! Repository contracts for the persisted state this pipeline touches:
//! gift records, stored loot, and inventory snapshots.
//!
//! The persistence internals are a collaborator; these traits specify only
//! the interface the pipeline needs. The gift lookup is the pipeline's sole
//! async round trip; everything else is consulted synchronously inside the
//! worker's sequential stream.

mod file;
mod memory;

pub use file::FileLootStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use world_core::{ActorId, Inventory, ItemGuid, LootPayload};

/// Errors from the storage collaborators.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Persisted record backing a wrapped gift item: the item's true identity,
/// restored when the gift is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftRecord {
    /// True template entry hidden by the wrap.
    pub entry: u32,
    /// Binding state restored on unwrap.
    pub bound: bool,
}

/// Async lookup of gift records by item guid.
#[async_trait]
pub trait GiftRepository: Send + Sync {
    async fn load(&self, item: ItemGuid) -> Result<Option<GiftRecord>, StorageError>;
}

/// Stored loot keyed by item instance guid. Synchronous: implementations
/// serve from a warm cache and never block the worker meaningfully.
pub trait LootStore: Send + Sync {
    fn load(&self, item: ItemGuid) -> Result<Option<LootPayload>, StorageError>;

    fn save(&self, item: ItemGuid, payload: &LootPayload) -> Result<(), StorageError>;

    fn delete(&self, item: ItemGuid) -> Result<(), StorageError>;
}

/// Character persistence for the unwrap transaction.
#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// Persists the owner's inventory/gold snapshot and deletes the consumed
    /// gift record in one transaction.
    async fn commit_unwrap(
        &self,
        owner: ActorId,
        inventory: &Inventory,
        consumed_gift: ItemGuid,
    ) -> Result<(), StorageError>;
}
