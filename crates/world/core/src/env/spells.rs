//! Spell definitions and the spell registry oracle.

use crate::state::{CastCategory, Difficulty, SpellId};

bitflags::bitflags! {
    /// Attribute flags of a spell definition.
    ///
    /// Only attributes the request pipeline consults live here; effect-level
    /// attributes belong to the execution engine.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct SpellAttributes: u32 {
        /// Never castable by request; applied automatically.
        const PASSIVE = 1 << 0;
        /// Aura applications of this spell cannot be canceled by the player.
        const NO_AURA_CANCEL = 1 << 1;
        /// Channeled; occupies the channeled cast slot.
        const CHANNELED = 1 << 2;
        /// Auto-repeating ranged spell; occupies the auto-repeat slot.
        const AUTO_REPEAT = 1 << 3;
        /// Raid-marker spell; castable without being known.
        const RAID_MARKER = 1 << 4;
        /// Beneficial.
        const POSITIVE = 1 << 5;
        /// Usable while the caster is in combat.
        const USABLE_IN_COMBAT = 1 << 6;
        /// Self-resurrection spells with this attribute work through a
        /// resurrection-prevention aura.
        const BYPASS_RESURRECTION_PREVENTION = 1 << 7;
        /// A vehicle passenger may cast this spell through the vehicle.
        const VEHICLE_PASSENGER_CAST = 1 << 8;
    }
}

/// Immutable, difficulty-scoped spell record.
///
/// Resolved by lookup through [`SpellOracle`]; never mutated by the request
/// pipeline.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellDefinition {
    pub id: SpellId,
    pub attributes: SpellAttributes,
}

impl SpellDefinition {
    pub fn new(id: SpellId, attributes: SpellAttributes) -> Self {
        Self { id, attributes }
    }

    pub fn is_passive(&self) -> bool {
        self.attributes.contains(SpellAttributes::PASSIVE)
    }

    pub fn is_channeled(&self) -> bool {
        self.attributes.contains(SpellAttributes::CHANNELED)
    }

    pub fn is_auto_repeat(&self) -> bool {
        self.attributes.contains(SpellAttributes::AUTO_REPEAT)
    }

    pub fn is_positive(&self) -> bool {
        self.attributes.contains(SpellAttributes::POSITIVE)
    }

    pub fn usable_in_combat(&self) -> bool {
        self.attributes.contains(SpellAttributes::USABLE_IN_COMBAT)
    }

    pub fn player_cancelable_aura(&self) -> bool {
        !self.attributes.contains(SpellAttributes::NO_AURA_CANCEL)
    }

    /// Cast slot this spell occupies when started.
    pub fn cast_category(&self) -> CastCategory {
        if self.is_channeled() {
            CastCategory::Channeled
        } else if self.is_auto_repeat() {
            CastCategory::AutoRepeat
        } else {
            CastCategory::Generic
        }
    }
}

/// Read-only spell registry, injected into the pipeline.
pub trait SpellOracle: Send + Sync {
    /// Resolves a spell definition scoped by difficulty. Implementations
    /// fall back to [`Difficulty::Normal`] when no scoped record exists.
    fn definition(&self, id: SpellId, difficulty: Difficulty) -> Option<SpellDefinition>;

    /// Level-scoped rank variant of a spell, keyed by the explicit unit
    /// target's effective level. `None` means no ranked variant exists for
    /// that level and the original spell must be kept unmodified.
    fn rank_for_level(
        &self,
        id: SpellId,
        difficulty: Difficulty,
        level: u32,
    ) -> Option<SpellDefinition>;

    /// Spell granted by a keybound override registry entry.
    fn keybound_override(&self, override_id: u32) -> Option<SpellId>;
}
