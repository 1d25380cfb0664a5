//! Outbound event payloads: per-session acknowledgments and world
//! broadcasts.

use serde::{Deserialize, Serialize};

use world_core::{
    ActorId, CastCategory, CastId, EquipError, ItemGuid, LootPayload, MirrorImageData, ObjectId,
    PetFeedback, Position, SpellId, SpellTargets, TriggerMode,
};

/// Acknowledgment delivered to one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Ack {
    /// Structured error code for an expected rule failure.
    EquipFailure { code: EquipError },

    /// Pairs the opaque client cast id with the server-assigned one.
    CastPrepare {
        client_cast_id: u64,
        server_cast_id: CastId,
    },

    /// Container loot delivery.
    Loot {
        item: ItemGuid,
        payload: LootPayload,
    },

    /// Explicit "no loot" answer for an empty container.
    NoLoot { item: ItemGuid },

    /// Mirror-image appearance data.
    MirrorImage(MirrorImageData),

    /// Pet action feedback.
    PetFeedback { pet: ActorId, feedback: PetFeedback },
}

/// Broadcast to every observer of the affected entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldBroadcast {
    CastStarted {
        caster: ActorId,
        cast_id: CastId,
        spell: SpellId,
        trigger: TriggerMode,
        targets: SpellTargets,
    },
    CastInterrupted {
        actor: ActorId,
        category: CastCategory,
        spell: SpellId,
    },
    AuraRemoved {
        actor: ActorId,
        spell: SpellId,
    },
    ItemBound {
        owner: ActorId,
        item: ItemGuid,
    },
    ObjectUsed {
        object: ObjectId,
        user: ActorId,
    },
    ObjectUseReported {
        object: ObjectId,
        entry: u32,
        user: ActorId,
    },
    Unsummoned {
        summon: ActorId,
    },
    SpellClicked {
        target: ActorId,
        clicker: ActorId,
    },
    MissileCollision {
        caster: ActorId,
        cast_id: CastId,
        position: Position,
    },
}

/// Event wrapper that carries addressing and the typed payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// Acknowledgment addressed to one session.
    Session { to: ActorId, ack: Ack },

    /// Broadcast to all observers.
    World(WorldBroadcast),
}
