//! Data-driven registry content and loaders.
//!
//! This crate houses the static registries the request pipeline consults and
//! provides loaders for RON data files:
//! - Spell catalogs (definitions, rank chains, keybound overrides)
//! - Item template catalogs
//! - Lock catalogs
//! - Loot table catalogs
//!
//! Content is consumed through the world-core oracle traits and never
//! appears in world state. All loaders use world-core types directly with
//! serde for RON deserialization.

pub mod registry;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use registry::{StaticRegistry, StaticRegistryBuilder};

#[cfg(feature = "loaders")]
pub use loaders::{
    ContentFactory, ItemCatalog, ItemLoader, LockCatalog, LockLoader, LootCatalog, LootLoader,
    LootTable, SpellCatalog, SpellLoader,
};
