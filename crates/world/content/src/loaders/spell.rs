//! Spell catalog loader.

use std::path::Path;

use serde::{Deserialize, Serialize};
use world_core::{Difficulty, SpellDefinition, SpellId};

use crate::loaders::{LoadResult, read_file};
use crate::registry::StaticRegistryBuilder;

/// Spell catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpellCatalog {
    pub spells: Vec<SpellRecord>,
    #[serde(default)]
    pub ranks: Vec<RankRecord>,
    #[serde(default)]
    pub keybound_overrides: Vec<KeyboundRecord>,
}

/// One spell definition, optionally scoped to a non-normal difficulty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellRecord {
    #[serde(default)]
    pub difficulty: Difficulty,
    pub definition: SpellDefinition,
}

/// One link of a rank chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankRecord {
    pub spell: SpellId,
    pub max_target_level: u32,
    pub rank: SpellId,
}

/// One keybound override registry entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboundRecord {
    pub override_id: u32,
    pub spell: SpellId,
}

impl SpellCatalog {
    /// Feeds this catalog into a registry builder.
    pub fn apply(self, mut builder: StaticRegistryBuilder) -> StaticRegistryBuilder {
        for record in self.spells {
            builder = builder.spell_scoped(record.difficulty, record.definition);
        }
        for record in self.ranks {
            builder = builder.rank(record.spell, record.max_target_level, record.rank);
        }
        for record in self.keybound_overrides {
            builder = builder.keybound_override(record.override_id, record.spell);
        }
        builder
    }
}

/// Loader for spell catalogs from RON files.
pub struct SpellLoader;

impl SpellLoader {
    /// Load a spell catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<SpellCatalog> {
        let content = read_file(path)?;
        let catalog: SpellCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spell catalog RON: {}", e))?;
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use world_core::{Difficulty, SpellAttributes, SpellOracle};

    #[test]
    fn catalog_parses_and_builds_registry() {
        let source = r#"
            (
                spells: [
                    (definition: (id: 10, attributes: "CHANNELED | POSITIVE")),
                    (difficulty: Heroic, definition: (id: 11, attributes: "")),
                ],
                ranks: [
                    (spell: 10, max_target_level: 20, rank: 12),
                ],
                keybound_overrides: [
                    (override_id: 4, spell: 10),
                ],
            )
        "#;
        let catalog: SpellCatalog = ron::from_str(source).unwrap();
        assert_eq!(catalog.spells.len(), 2);
        assert_eq!(catalog.spells[0].difficulty, Difficulty::Normal);
        assert_eq!(catalog.spells[1].difficulty, Difficulty::Heroic);

        let registry = catalog
            .apply(crate::registry::StaticRegistry::builder())
            .build();
        let def = registry
            .definition(SpellId(10), Difficulty::Normal)
            .unwrap();
        assert!(def.attributes.contains(SpellAttributes::CHANNELED));
        assert!(def.attributes.contains(SpellAttributes::POSITIVE));
        assert_eq!(registry.keybound_override(4), Some(SpellId(10)));
    }
}
