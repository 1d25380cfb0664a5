//! Lock catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use world_core::LockDefinition;

use crate::loaders::{LoadResult, read_file};

/// Lock catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockCatalog {
    pub locks: Vec<LockDefinition>,
}

/// Loader for lock catalogs from RON files.
pub struct LockLoader;

impl LockLoader {
    /// Load a lock catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<LockDefinition>> {
        let content = read_file(path)?;
        let catalog: LockCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse lock catalog RON: {}", e))?;
        Ok(catalog.locks)
    }
}
