//! Item template catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use world_core::ItemTemplate;

use crate::loaders::{LoadResult, read_file};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemTemplate>,
}

/// Loader for item template catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load an item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<ItemTemplate>> {
        let content = read_file(path)?;
        let catalog: ItemCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        Ok(catalog.items)
    }
}
