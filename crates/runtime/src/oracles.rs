//! Owned oracle bundle for the session worker.

use std::sync::Arc;

use world_content::StaticRegistry;
use world_core::env::Env;
use world_core::{
    ItemTemplateOracle, LockOracle, LootOracle, PcgRng, RngOracle, SpellOracle, WorldEnv,
};

/// Owns the injected registries and lends them to the pipeline as a
/// [`WorldEnv`] per request.
#[derive(Clone)]
pub struct OracleSet {
    spells: Arc<dyn SpellOracle>,
    items: Arc<dyn ItemTemplateOracle>,
    locks: Arc<dyn LockOracle>,
    loot: Arc<dyn LootOracle>,
    rng: Arc<dyn RngOracle>,
}

impl OracleSet {
    pub fn new(
        spells: Arc<dyn SpellOracle>,
        items: Arc<dyn ItemTemplateOracle>,
        locks: Arc<dyn LockOracle>,
        loot: Arc<dyn LootOracle>,
        rng: Arc<dyn RngOracle>,
    ) -> Self {
        Self {
            spells,
            items,
            locks,
            loot,
            rng,
        }
    }

    /// Builds the set from one static registry serving every oracle trait.
    pub fn from_registry(registry: Arc<StaticRegistry>) -> Self {
        Self {
            spells: registry.clone(),
            items: registry.clone(),
            locks: registry.clone(),
            loot: registry,
            rng: Arc::new(PcgRng),
        }
    }

    /// Lends the oracles as the environment consumed by the pipeline.
    pub fn as_env(&self) -> WorldEnv<'_> {
        Env::new(
            Some(self.spells.as_ref()),
            Some(self.items.as_ref()),
            Some(self.locks.as_ref()),
            Some(self.loot.as_ref()),
            Some(self.rng.as_ref()),
        )
    }
}
