//! Loot table templates for container items.

/// One row of a container's loot table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootTemplateEntry {
    pub item_entry: u32,
    /// Drop chance in whole percent, 1..=100.
    pub chance: u32,
    pub min_count: u16,
    pub max_count: u16,
}

/// Read-only loot table registry, keyed by the container item's template
/// entry.
pub trait LootOracle: Send + Sync {
    fn table(&self, item_entry: u32) -> Vec<LootTemplateEntry>;
}
