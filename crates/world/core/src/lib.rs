//! Authoritative request validation and dispatch for the world server.
//!
//! `world-core` defines the canonical rules for client-originated action
//! requests (item use, spell casts, aura cancellation, object interaction,
//! summon destruction) and exposes pure APIs reused by the runtime and by
//! offline tools. Every request flows through [`request::RequestPipeline`],
//! which re-validates the claim against current [`state::WorldState`] before
//! any mutation, and supporting crates depend on the types re-exported here.
pub mod config;
pub mod env;
pub mod loot;
pub mod request;
pub mod state;

pub use config::WorldConfig;
pub use env::{
    BondingPolicy, Env, InventoryKind, ItemClass, ItemTemplate, ItemTemplateFlags,
    ItemTemplateOracle, LockDefinition, LockOracle, LootOracle, LootTemplateEntry, OracleError,
    PcgRng, RngOracle, SpellAttributes, SpellDefinition, SpellOracle, WorldEnv,
};
pub use request::{
    CastRequest, Directive, EquipError, IntegrityError, MirrorImageData, MoveStop, PetFeedback,
    ProtocolViolation, Rejection, Request, RequestPipeline, SessionContext, TargetDescriptor,
    UseItemRequest,
};
pub use state::{
    ActiveCast, ActorId, ActorKind, ActorState, Appearance, AuraApplication, AuraBehavior,
    AuraFlags, AuraSet, CastCategory, CastId, CastSet, Difficulty, GameObjectState, Inventory,
    ItemGuid, ItemInstance, LootEntry, LootPayload, ObjectId, Position, SlotRef, SpellId,
    SpellTargets, TriggerMode, WorldState,
};
