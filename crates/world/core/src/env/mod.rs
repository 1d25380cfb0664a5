//! Traits describing read-only registry data.
//!
//! Oracles expose spell definitions, item templates, lock records, and loot
//! tables. The [`Env`] aggregate bundles them so the request pipeline can
//! access everything it needs without hard coupling to concrete registry
//! implementations; registries are injected, never ambient globals.
mod error;
mod items;
mod locks;
mod loot;
mod rng;
mod spells;

pub use error::OracleError;
pub use items::{
    BondingPolicy, InventoryKind, ItemClass, ItemTemplate, ItemTemplateFlags, ItemTemplateOracle,
};
pub use locks::{LockDefinition, LockOracle};
pub use loot::{LootOracle, LootTemplateEntry};
pub use rng::{PcgRng, RngOracle, loot_seed};
pub use spells::{SpellAttributes, SpellDefinition, SpellOracle};

pub use crate::state::Difficulty;

/// Aggregates the read-only oracles required by the request pipeline.
#[derive(Clone, Copy, Debug)]
pub struct Env<'a, S, I, K, L, R>
where
    S: SpellOracle + ?Sized,
    I: ItemTemplateOracle + ?Sized,
    K: LockOracle + ?Sized,
    L: LootOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    spells: Option<&'a S>,
    items: Option<&'a I>,
    locks: Option<&'a K>,
    loot: Option<&'a L>,
    rng: Option<&'a R>,
}

pub type WorldEnv<'a> = Env<
    'a,
    dyn SpellOracle + 'a,
    dyn ItemTemplateOracle + 'a,
    dyn LockOracle + 'a,
    dyn LootOracle + 'a,
    dyn RngOracle + 'a,
>;

impl<'a, S, I, K, L, R> Env<'a, S, I, K, L, R>
where
    S: SpellOracle + ?Sized,
    I: ItemTemplateOracle + ?Sized,
    K: LockOracle + ?Sized,
    L: LootOracle + ?Sized,
    R: RngOracle + ?Sized,
{
    pub fn new(
        spells: Option<&'a S>,
        items: Option<&'a I>,
        locks: Option<&'a K>,
        loot: Option<&'a L>,
        rng: Option<&'a R>,
    ) -> Self {
        Self {
            spells,
            items,
            locks,
            loot,
            rng,
        }
    }

    pub fn with_all(spells: &'a S, items: &'a I, locks: &'a K, loot: &'a L, rng: &'a R) -> Self {
        Self::new(Some(spells), Some(items), Some(locks), Some(loot), Some(rng))
    }

    pub fn empty() -> Self {
        Self {
            spells: None,
            items: None,
            locks: None,
            loot: None,
            rng: None,
        }
    }

    /// Returns the SpellOracle, or an error if not available.
    pub fn spells(&self) -> Result<&'a S, OracleError> {
        self.spells.ok_or(OracleError::SpellsNotAvailable)
    }

    /// Returns the ItemTemplateOracle, or an error if not available.
    pub fn items(&self) -> Result<&'a I, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }

    /// Returns the LockOracle, or an error if not available.
    pub fn locks(&self) -> Result<&'a K, OracleError> {
        self.locks.ok_or(OracleError::LocksNotAvailable)
    }

    /// Returns the LootOracle, or an error if not available.
    pub fn loot(&self) -> Result<&'a L, OracleError> {
        self.loot.ok_or(OracleError::LootNotAvailable)
    }

    /// Returns the RngOracle, or an error if not available.
    pub fn rng(&self) -> Result<&'a R, OracleError> {
        self.rng.ok_or(OracleError::RngNotAvailable)
    }
}

impl<'a, S, I, K, L, R> Env<'a, S, I, K, L, R>
where
    S: SpellOracle + 'a,
    I: ItemTemplateOracle + 'a,
    K: LockOracle + 'a,
    L: LootOracle + 'a,
    R: RngOracle + 'a,
{
    /// Converts this environment into a trait-object based [`WorldEnv`].
    pub fn as_world_env(&self) -> WorldEnv<'a> {
        let spells: Option<&'a dyn SpellOracle> = self.spells.map(|s| s as _);
        let items: Option<&'a dyn ItemTemplateOracle> = self.items.map(|i| i as _);
        let locks: Option<&'a dyn LockOracle> = self.locks.map(|k| k as _);
        let loot: Option<&'a dyn LootOracle> = self.loot.map(|l| l as _);
        let rng: Option<&'a dyn RngOracle> = self.rng.map(|r| r as _);
        Env::new(spells, items, locks, loot, rng)
    }
}
