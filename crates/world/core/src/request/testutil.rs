//! Shared fixtures for pipeline tests.

use std::collections::HashMap;

use super::{Directive, Rejection, Request, RequestPipeline, SessionContext};
use crate::env::{
    Difficulty, Env, ItemTemplate, ItemTemplateOracle, LockDefinition, LockOracle, LootOracle,
    LootTemplateEntry, PcgRng, SpellAttributes, SpellDefinition, SpellOracle,
};
use crate::state::{ActorId, ActorKind, ActorState, Position, SpellId, WorldState};

static RNG: PcgRng = PcgRng;

/// Hash-map backed registry implementing every oracle for tests.
#[derive(Default)]
pub(crate) struct FixtureRegistry {
    spells: HashMap<(u32, Difficulty), SpellDefinition>,
    /// spell -> [(max target level, rank spell id)], ascending by level
    ranks: HashMap<u32, Vec<(u32, u32)>>,
    keybound: HashMap<u32, SpellId>,
    items: HashMap<u32, ItemTemplate>,
    locks: HashMap<u32, LockDefinition>,
    loot: HashMap<u32, Vec<LootTemplateEntry>>,
}

impl FixtureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spell(mut self, id: u32, attributes: SpellAttributes) -> Self {
        self.spells.insert(
            (id, Difficulty::Normal),
            SpellDefinition::new(SpellId(id), attributes),
        );
        self
    }

    pub fn rank(mut self, spell: u32, max_level: u32, rank_spell: u32) -> Self {
        self.ranks.entry(spell).or_default().push((max_level, rank_spell));
        self
    }

    pub fn keybound(mut self, override_id: u32, spell: u32) -> Self {
        self.keybound.insert(override_id, SpellId(spell));
        self
    }

    pub fn item(mut self, template: ItemTemplate) -> Self {
        self.items.insert(template.entry, template);
        self
    }

    pub fn lock(mut self, id: u32) -> Self {
        self.locks.insert(
            id,
            LockDefinition {
                id,
                key_item: None,
                pick_skill: None,
            },
        );
        self
    }

    pub fn loot_table(mut self, item_entry: u32, rows: Vec<LootTemplateEntry>) -> Self {
        self.loot.insert(item_entry, rows);
        self
    }

    pub fn env(&self) -> crate::env::WorldEnv<'_> {
        Env::with_all(self, self, self, self, &RNG).as_world_env()
    }
}

impl SpellOracle for FixtureRegistry {
    fn definition(&self, id: SpellId, difficulty: Difficulty) -> Option<SpellDefinition> {
        self.spells
            .get(&(id.0, difficulty))
            .or_else(|| self.spells.get(&(id.0, Difficulty::Normal)))
            .cloned()
    }

    fn rank_for_level(
        &self,
        id: SpellId,
        difficulty: Difficulty,
        level: u32,
    ) -> Option<SpellDefinition> {
        let chain = self.ranks.get(&id.0)?;
        let rank = chain
            .iter()
            .find(|(max_level, _)| level <= *max_level)
            .map(|(_, rank)| SpellId(*rank))?;
        self.definition(rank, difficulty)
    }

    fn keybound_override(&self, override_id: u32) -> Option<SpellId> {
        self.keybound.get(&override_id).copied()
    }
}

impl ItemTemplateOracle for FixtureRegistry {
    fn template(&self, entry: u32) -> Option<ItemTemplate> {
        self.items.get(&entry).cloned()
    }
}

impl LockOracle for FixtureRegistry {
    fn lookup(&self, id: u32) -> Option<LockDefinition> {
        self.locks.get(&id).cloned()
    }
}

impl LootOracle for FixtureRegistry {
    fn table(&self, item_entry: u32) -> Vec<LootTemplateEntry> {
        self.loot.get(&item_entry).cloned().unwrap_or_default()
    }
}

/// A world holding one player actor with id 1, plus its session.
pub(crate) fn player_world() -> (WorldState, SessionContext) {
    let mut world = WorldState::new();
    world.add_actor(ActorState::new(
        ActorId(1),
        ActorKind::Player,
        Position::ORIGIN,
    ));
    (world, SessionContext::new(ActorId(1)))
}

pub(crate) fn process(
    world: &mut WorldState,
    registry: &FixtureRegistry,
    session: SessionContext,
    request: Request,
) -> Result<Vec<Directive>, Rejection> {
    RequestPipeline::new(world).process(&registry.env(), session, &request)
}
