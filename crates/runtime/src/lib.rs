//! Tokio session runtime over the world-core request pipeline.
//!
//! The [`session::SessionWorker`] owns the authoritative
//! [`world_core::WorldState`] and processes commands strictly sequentially:
//! one request runs to completion, including all synchronous state checks,
//! before the next begins. The sole suspension point is the wrapped-item
//! gift lookup, whose continuation re-enters the same worker's command
//! stream and re-validates its captured identity before mutating anything.
//!
//! Outbound traffic (per-session acknowledgments and world broadcasts)
//! flows through the topic-based [`events::EventBus`].

pub mod api;
pub mod events;
pub mod loot;
pub mod oracles;
pub mod reconcile;
pub mod repository;
pub mod session;

pub use api::{Result, RuntimeError, WorldHandle};
pub use events::{Ack, Event, EventBus, Topic, WorldBroadcast};
pub use oracles::OracleSet;
pub use reconcile::PendingWrappedOpen;
pub use repository::{
    CharacterStore, FileLootStore, GiftRecord, GiftRepository, LootStore, MemoryStore,
    StorageError,
};
pub use session::{Command, SessionWorker, spawn_session_worker};
