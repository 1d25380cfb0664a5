//! World state model: identities, actors, items, casts, and the shared
//! [`WorldState`] with its entity-directory lookups.

mod common;
pub mod types;
mod world;

pub use common::{ActorId, CastId, Difficulty, ItemGuid, ObjectId, Position, SpellId};
pub use types::{
    ActiveCast, ActorKind, ActorState, Appearance, AuraApplication, AuraBehavior, AuraFlags,
    AuraSet, CastCategory, CastSet, Inventory, ItemInstance, LootEntry, LootPayload, SlotRef,
    SpellTargets, TriggerMode,
};
pub use world::{GameObjectState, WorldState};
