//! In-memory registry implementing the world-core oracle traits.

use std::collections::HashMap;

use world_core::env::Env;
use world_core::{
    ActorState, Difficulty, EquipError, ItemTemplate, ItemTemplateOracle, LockDefinition,
    LockOracle, LootOracle, LootTemplateEntry, PcgRng, SpellDefinition, SpellId, SpellOracle,
    WorldEnv,
};

/// One link of a rank chain: the variant used for targets up to
/// `max_target_level`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct RankLink {
    max_target_level: u32,
    rank: SpellId,
}

/// Static, read-only registry backing all oracle traits.
///
/// Built once from catalogs (or a builder) and injected into the pipeline;
/// never mutated afterwards.
pub struct StaticRegistry {
    spells: HashMap<(SpellId, Difficulty), SpellDefinition>,
    ranks: HashMap<SpellId, Vec<RankLink>>,
    keybound: HashMap<u32, SpellId>,
    items: HashMap<u32, ItemTemplate>,
    locks: HashMap<u32, LockDefinition>,
    loot: HashMap<u32, Vec<LootTemplateEntry>>,
    rng: PcgRng,
}

impl StaticRegistry {
    pub fn builder() -> StaticRegistryBuilder {
        StaticRegistryBuilder::default()
    }

    /// Bundles this registry into the oracle environment consumed by the
    /// request pipeline.
    pub fn env(&self) -> WorldEnv<'_> {
        Env::with_all(self, self, self, self, &self.rng).as_world_env()
    }
}

impl SpellOracle for StaticRegistry {
    fn definition(&self, id: SpellId, difficulty: Difficulty) -> Option<SpellDefinition> {
        // difficulty-scoped record first, then the base record
        self.spells
            .get(&(id, difficulty))
            .or_else(|| self.spells.get(&(id, Difficulty::Normal)))
            .cloned()
    }

    fn rank_for_level(
        &self,
        id: SpellId,
        difficulty: Difficulty,
        level: u32,
    ) -> Option<SpellDefinition> {
        let chain = self.ranks.get(&id)?;
        let link = chain
            .iter()
            .find(|link| level <= link.max_target_level)?;
        self.definition(link.rank, difficulty)
    }

    fn keybound_override(&self, override_id: u32) -> Option<SpellId> {
        self.keybound.get(&override_id).copied()
    }
}

impl ItemTemplateOracle for StaticRegistry {
    fn template(&self, entry: u32) -> Option<ItemTemplate> {
        self.items.get(&entry).cloned()
    }

    fn can_use(&self, actor: &ActorState, template: &ItemTemplate) -> Result<(), EquipError> {
        if actor.level < template.required_level {
            return Err(EquipError::ItemNotFound);
        }
        Ok(())
    }
}

impl LockOracle for StaticRegistry {
    fn lookup(&self, id: u32) -> Option<LockDefinition> {
        self.locks.get(&id).cloned()
    }
}

impl LootOracle for StaticRegistry {
    fn table(&self, item_entry: u32) -> Vec<LootTemplateEntry> {
        self.loot.get(&item_entry).cloned().unwrap_or_default()
    }
}

/// Builder for assembling a [`StaticRegistry`] in code (tests, tools).
#[derive(Default)]
pub struct StaticRegistryBuilder {
    spells: Vec<(Difficulty, SpellDefinition)>,
    ranks: Vec<(SpellId, u32, SpellId)>,
    keybound: Vec<(u32, SpellId)>,
    items: Vec<ItemTemplate>,
    locks: Vec<LockDefinition>,
    loot: Vec<(u32, Vec<LootTemplateEntry>)>,
}

impl StaticRegistryBuilder {
    pub fn spell(mut self, definition: SpellDefinition) -> Self {
        self.spells.push((Difficulty::Normal, definition));
        self
    }

    pub fn spell_scoped(mut self, difficulty: Difficulty, definition: SpellDefinition) -> Self {
        self.spells.push((difficulty, definition));
        self
    }

    pub fn rank(mut self, spell: SpellId, max_target_level: u32, rank: SpellId) -> Self {
        self.ranks.push((spell, max_target_level, rank));
        self
    }

    pub fn keybound_override(mut self, override_id: u32, spell: SpellId) -> Self {
        self.keybound.push((override_id, spell));
        self
    }

    pub fn item(mut self, template: ItemTemplate) -> Self {
        self.items.push(template);
        self
    }

    pub fn lock(mut self, definition: LockDefinition) -> Self {
        self.locks.push(definition);
        self
    }

    pub fn loot_table(mut self, item_entry: u32, rows: Vec<LootTemplateEntry>) -> Self {
        self.loot.push((item_entry, rows));
        self
    }

    pub fn build(self) -> StaticRegistry {
        let mut spells = HashMap::new();
        for (difficulty, definition) in self.spells {
            spells.insert((definition.id, difficulty), definition);
        }

        let mut ranks: HashMap<SpellId, Vec<RankLink>> = HashMap::new();
        for (spell, max_target_level, rank) in self.ranks {
            ranks.entry(spell).or_default().push(RankLink {
                max_target_level,
                rank,
            });
        }
        // ascending by level cap so lookup picks the tightest variant
        for chain in ranks.values_mut() {
            chain.sort_by_key(|link| link.max_target_level);
        }

        StaticRegistry {
            spells,
            ranks,
            keybound: self.keybound.into_iter().collect(),
            items: self
                .items
                .into_iter()
                .map(|template| (template.entry, template))
                .collect(),
            locks: self
                .locks
                .into_iter()
                .map(|lock| (lock.id, lock))
                .collect(),
            loot: self.loot.into_iter().collect(),
            rng: PcgRng,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use world_core::SpellAttributes;

    #[test]
    fn difficulty_lookup_falls_back_to_normal() {
        let registry = StaticRegistry::builder()
            .spell(SpellDefinition::new(SpellId(1), SpellAttributes::POSITIVE))
            .spell_scoped(
                Difficulty::Heroic,
                SpellDefinition::new(SpellId(2), SpellAttributes::empty()),
            )
            .build();

        // base record serves every difficulty
        assert!(registry.definition(SpellId(1), Difficulty::Mythic).is_some());
        // scoped record only serves its own difficulty
        assert!(registry.definition(SpellId(2), Difficulty::Heroic).is_some());
        assert!(registry.definition(SpellId(2), Difficulty::Normal).is_none());
    }

    #[test]
    fn rank_chain_picks_tightest_level_cap() {
        let registry = StaticRegistry::builder()
            .spell(SpellDefinition::new(SpellId(1), SpellAttributes::POSITIVE))
            .spell(SpellDefinition::new(SpellId(2), SpellAttributes::POSITIVE))
            .spell(SpellDefinition::new(SpellId(3), SpellAttributes::POSITIVE))
            .rank(SpellId(1), 40, SpellId(3))
            .rank(SpellId(1), 20, SpellId(2))
            .build();

        assert_eq!(
            registry
                .rank_for_level(SpellId(1), Difficulty::Normal, 15)
                .unwrap()
                .id,
            SpellId(2)
        );
        assert_eq!(
            registry
                .rank_for_level(SpellId(1), Difficulty::Normal, 30)
                .unwrap()
                .id,
            SpellId(3)
        );
        assert!(registry
            .rank_for_level(SpellId(1), Difficulty::Normal, 60)
            .is_none());
    }
}
