//! Directives emitted by the dispatcher for execution subsystems.
//!
//! A directive is the minimum acknowledgment or forwarding required by the
//! protocol: the runtime translates each into a per-session ack, a world
//! broadcast, an execution-engine entry point, or a persistence request.
//! The core itself never performs I/O.

use crate::state::{
    ActorId, CastCategory, CastId, ItemGuid, ObjectId, Position, SlotRef, SpellId, SpellTargets,
    TriggerMode,
};

/// Mirror-image appearance data, in the two protocol variants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MirrorImageData {
    /// Fully parameterized humanoid appearance (player creators).
    Humanoid {
        unit: ActorId,
        display_id: u32,
        race: u8,
        gender: u8,
        class: u8,
        customizations: Vec<u32>,
        guild: Option<u64>,
        /// Display ids of the visible equipment slots, zero when empty.
        item_display_ids: Vec<u32>,
    },
    /// Plain creature display id (non-player creators).
    Creature { unit: ActorId, display_id: u32 },
}

/// Feedback sent to the client about a pet action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PetFeedback {
    Dead,
}

/// Output of a successfully dispatched request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Directive {
    /// Correlate the client cast id with the server-assigned one.
    CastPrepare {
        client_cast_id: u64,
        server_cast_id: CastId,
    },

    /// Hand a validated, registered cast to the execution engine.
    BeginCast {
        caster: ActorId,
        cast_id: CastId,
        spell: SpellId,
        trigger: TriggerMode,
        targets: SpellTargets,
    },

    /// An active cast was interrupted (cancellation or displacement).
    InterruptCast {
        actor: ActorId,
        category: CastCategory,
        spell: SpellId,
    },

    /// An aura application was removed; broadcast to observers.
    AuraRemoved { actor: ActorId, spell: SpellId },

    /// An unbound item flipped to bound; notify the collection tracker.
    ItemBound { owner: ActorId, item: ItemGuid },

    /// Forward an object interaction to the object's AI hook.
    UseObject { object: ObjectId, user: ActorId },

    /// Forward a report-use to the object's AI hook; the criteria
    /// collaborator records usage if the hook does not consume it.
    ObjectUseReported {
        object: ObjectId,
        entry: u32,
        user: ActorId,
    },

    /// A summon was destroyed at its owner's request.
    Unsummoned { summon: ActorId },

    /// Forward a click-to-interact to the creature's spell-click hook.
    SpellClick { target: ActorId, clicker: ActorId },

    /// Pet action feedback for the requesting session.
    PetFeedback { pet: ActorId, feedback: PetFeedback },

    /// Mirror-image answer for the requesting session.
    MirrorImage(MirrorImageData),

    /// Missile collision accepted; broadcast the new impact position to all
    /// observers of the caster.
    MissileCollisionBroadcast {
        caster: ActorId,
        cast_id: CastId,
        position: Position,
    },

    /// Begin the deferred wrapped-item open: the runtime issues the gift
    /// lookup and re-validates `(slot, item)` on completion.
    OpenWrapped { slot: SlotRef, item: ItemGuid },

    /// Materialize and deliver container loot for a validated open.
    OpenContainer { slot: SlotRef, item: ItemGuid },
}
