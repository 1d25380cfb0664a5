//! Aura applications attached to actors.
//!
//! Each application snapshots the flags that matter for cancellation
//! (positive/passive/cancel-restricted) at application time, so bulk cancel
//! predicates never need an oracle lookup. The caster back-reference is weak:
//! it is resolved through the entity directory at use and treated as gone
//! when the lookup fails.

use arrayvec::ArrayVec;

use super::super::common::{ActorId, SpellId};
use crate::config::WorldConfig;

bitflags::bitflags! {
    /// Cancellation-relevant properties snapshotted when the aura is applied.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct AuraFlags: u8 {
        /// Beneficial effect; only positive auras are player-cancelable.
        const POSITIVE = 1 << 0;
        /// Passive effect; never player-cancelable even when positive.
        const PASSIVE = 1 << 1;
        /// Cancel-restricted regardless of positivity.
        const NO_CANCEL = 1 << 2;
        /// Removed when the bearer uses an item.
        const INTERRUPT_ON_ITEM_USE = 1 << 3;
    }
}

/// Behavioral category of an aura, used for category-scoped bulk cancels and
/// for the special grants the pipeline consults (client-trigger spells,
/// actionbar overrides, keybound overrides, clone-caster).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AuraBehavior {
    Generic,
    /// Mount effect; target of the cancel-mount-auras request.
    Mounted,
    /// Scale modifier; target of the cancel-scale-auras request.
    ModScale,
    /// Speed modifier that removes movement control; target of the
    /// cancel-uncontrolled-speed-auras request.
    ModSpeedUncontrolled,
    /// The bearer mirrors the appearance of the aura's caster.
    CloneCaster,
    /// Blocks self-resurrection spells without the bypass attribute.
    PreventResurrection,
    /// Grants the bearer permission to client-trigger the given spell; such
    /// casts run system-triggered.
    ClientTriggerSpell(SpellId),
    /// Replaces one castable spell with another while active.
    OverrideSpell {
        original: SpellId,
        replacement: SpellId,
    },
    /// Grants a keybound override with the given registry id.
    KeyboundOverride(u32),
}

/// One effect instance attached to an actor.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuraApplication {
    pub spell: SpellId,
    pub behavior: AuraBehavior,
    /// Weak back-reference to the caster; does not keep the caster alive.
    pub caster: Option<ActorId>,
    pub flags: AuraFlags,
}

impl AuraApplication {
    /// True when a player may remove this aura through a bulk category
    /// cancel: not cancel-restricted, positive, and not passive.
    pub fn player_cancelable(&self) -> bool {
        !self.flags.contains(AuraFlags::NO_CANCEL)
            && self.flags.contains(AuraFlags::POSITIVE)
            && !self.flags.contains(AuraFlags::PASSIVE)
    }
}

/// Bounded set of aura applications on one actor.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AuraSet {
    auras: ArrayVec<AuraApplication, { WorldConfig::MAX_AURAS }>,
}

impl AuraSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Applies an aura if there is room; silently drops it otherwise.
    pub fn apply(&mut self, aura: AuraApplication) {
        if !self.auras.is_full() {
            self.auras.push(aura);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &AuraApplication> {
        self.auras.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.auras.is_empty()
    }

    /// Removes one owned aura matching spell id and (when given) caster.
    ///
    /// Returns true if an application was removed.
    pub fn remove_owned(&mut self, spell: SpellId, caster: Option<ActorId>) -> bool {
        let before = self.auras.len();
        self.auras
            .retain(|a| !(a.spell == spell && (caster.is_none() || a.caster == caster)));
        self.auras.len() != before
    }

    /// Bulk cancel: removes every player-cancelable aura whose behavior
    /// matches the predicate. Each aura is judged independently; protected
    /// ones stay. Returns the spell ids of the removed applications.
    pub fn cancel_matching(
        &mut self,
        mut behavior: impl FnMut(&AuraBehavior) -> bool,
    ) -> Vec<SpellId> {
        let mut removed = Vec::new();
        self.auras.retain(|a| {
            if behavior(&a.behavior) && a.player_cancelable() {
                removed.push(a.spell);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Removes every aura flagged to break on item use.
    pub fn interrupt_on_item_use(&mut self) -> Vec<SpellId> {
        let mut removed = Vec::new();
        self.auras.retain(|a| {
            if a.flags.contains(AuraFlags::INTERRUPT_ON_ITEM_USE) {
                removed.push(a.spell);
                false
            } else {
                true
            }
        });
        removed
    }

    /// True when a client-trigger aura grants the given spell.
    pub fn grants_client_trigger(&self, spell: SpellId) -> bool {
        self.auras
            .iter()
            .any(|a| a.behavior == AuraBehavior::ClientTriggerSpell(spell))
    }

    /// Replacement spell for a cast override aura matching `original`.
    pub fn override_for(&self, original: SpellId) -> Option<SpellId> {
        self.auras.iter().find_map(|a| match a.behavior {
            AuraBehavior::OverrideSpell {
                original: from,
                replacement,
            } if from == original => Some(replacement),
            _ => None,
        })
    }

    /// True when a keybound-override aura with the given registry id is held.
    pub fn has_keybound_override(&self, override_id: u32) -> bool {
        self.auras
            .iter()
            .any(|a| a.behavior == AuraBehavior::KeyboundOverride(override_id))
    }

    /// Caster of the first clone-caster aura, if any. Clone-caster does not
    /// stack, so the first application is authoritative.
    pub fn clone_caster_source(&self) -> Option<ActorId> {
        self.auras
            .iter()
            .find(|a| a.behavior == AuraBehavior::CloneCaster)
            .and_then(|a| a.caster)
    }

    pub fn prevents_resurrection(&self) -> bool {
        self.auras
            .iter()
            .any(|a| a.behavior == AuraBehavior::PreventResurrection)
    }
}
