//! Actor state: anything that can act or be targeted.

use std::collections::BTreeSet;

use arrayvec::ArrayVec;

use super::super::common::{ActorId, Difficulty, Position, SpellId};
use super::aura::AuraSet;
use super::cast::CastSet;
use super::item::Inventory;
use crate::config::WorldConfig;

/// Broad classification used by directory lookups and authority gates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActorKind {
    Player,
    Creature,
    Pet,
    Vehicle,
    Totem,
}

/// Appearance data served to mirror-image queries.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Appearance {
    pub display_id: u32,
    pub race: u8,
    pub gender: u8,
    pub class: u8,
    pub customizations: Vec<u32>,
    pub guild: Option<u64>,
}

/// Complete mutable state of one live actor.
///
/// The world owns all actors; the request pipeline holds only transient
/// references validated at the start of each request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: ActorId,
    pub kind: ActorKind,
    pub position: Position,
    pub level: u32,
    pub difficulty: Difficulty,

    pub alive: bool,
    pub in_combat: bool,
    /// Ranked-competition context; restricts consumable use.
    pub in_arena: bool,
    /// True while this actor possesses another unit. A possessor may not
    /// cast through itself.
    pub possessing: bool,
    /// Vehicle this actor currently occupies.
    pub vehicle: Option<ActorId>,
    pub mounted: bool,

    /// Owner, for guardians/pets/totems.
    pub owner: Option<ActorId>,
    /// Controller, for charmed units.
    pub charmer: Option<ActorId>,

    pub known_spells: BTreeSet<SpellId>,
    /// Granted one-shot self-resurrection spells.
    pub self_res_spells: ArrayVec<SpellId, { WorldConfig::MAX_SELF_RES_SPELLS }>,

    pub auras: AuraSet,
    pub casts: CastSet,
    pub summon_slots: [Option<ActorId>; WorldConfig::MAX_TOTEM_SLOTS],

    pub inventory: Inventory,
    pub appearance: Appearance,
}

impl ActorState {
    pub fn new(id: ActorId, kind: ActorKind, position: Position) -> Self {
        Self {
            id,
            kind,
            position,
            level: 1,
            difficulty: Difficulty::Normal,
            alive: true,
            in_combat: false,
            in_arena: false,
            possessing: false,
            vehicle: None,
            mounted: false,
            owner: None,
            charmer: None,
            known_spells: BTreeSet::new(),
            self_res_spells: ArrayVec::new(),
            auras: AuraSet::empty(),
            casts: CastSet::default(),
            summon_slots: [None; WorldConfig::MAX_TOTEM_SLOTS],
            inventory: Inventory::empty(),
            appearance: Appearance::default(),
        }
    }

    pub fn is_player(&self) -> bool {
        self.kind == ActorKind::Player
    }

    pub fn knows_spell(&self, spell: SpellId) -> bool {
        self.known_spells.contains(&spell)
    }

    pub fn is_on_vehicle(&self, vehicle: ActorId) -> bool {
        self.vehicle == Some(vehicle)
    }

    /// Effective level of this actor when targeted by `caster`.
    ///
    /// Rank selection for level-scoped spell variants keys off this value.
    pub fn level_for(&self, _caster: &ActorState) -> u32 {
        self.level
    }

    // ========================================================================
    // Builder helpers (used heavily by tests and world setup)
    // ========================================================================

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_known_spell(mut self, spell: SpellId) -> Self {
        self.known_spells.insert(spell);
        self
    }

    pub fn with_owner(mut self, owner: ActorId) -> Self {
        self.owner = Some(owner);
        self
    }
}
