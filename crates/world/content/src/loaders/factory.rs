//! Content factory for building the static registry from a data directory.

use std::path::PathBuf;

use crate::loaders::{ItemLoader, LoadResult, LockLoader, LootLoader, SpellLoader};
use crate::registry::StaticRegistry;

/// Loads all registry content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── spells.ron
/// ├── items.ron
/// ├── locks.ron
/// └── loot.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load every catalog and assemble the registry.
    ///
    /// Missing catalog files are errors; an intentionally empty catalog
    /// should still exist on disk.
    pub fn load_registry(&self) -> LoadResult<StaticRegistry> {
        let spells = SpellLoader::load(&self.data_dir.join("spells.ron"))?;
        let items = ItemLoader::load(&self.data_dir.join("items.ron"))?;
        let locks = LockLoader::load(&self.data_dir.join("locks.ron"))?;
        let loot = LootLoader::load(&self.data_dir.join("loot.ron"))?;

        let mut builder = spells.apply(StaticRegistry::builder());
        for template in items {
            builder = builder.item(template);
        }
        for lock in locks {
            builder = builder.lock(lock);
        }
        for table in loot.tables {
            builder = builder.loot_table(table.item_entry, table.rows);
        }
        Ok(builder.build())
    }
}
