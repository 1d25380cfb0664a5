//! Loot table catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use world_core::LootTemplateEntry;

use crate::loaders::{LoadResult, read_file};

/// Loot catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootCatalog {
    pub tables: Vec<LootTable>,
}

/// Loot table for one container item entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LootTable {
    pub item_entry: u32,
    pub rows: Vec<LootTemplateEntry>,
}

/// Loader for loot catalogs from RON files.
pub struct LootLoader;

impl LootLoader {
    /// Load a loot catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<LootCatalog> {
        let content = read_file(path)?;
        let catalog: LootCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse loot catalog RON: {}", e))?;
        Ok(catalog)
    }
}
