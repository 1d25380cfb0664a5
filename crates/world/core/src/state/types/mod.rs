//! State types for actors, auras, casts, and items.

pub mod actor;
pub mod aura;
pub mod cast;
pub mod item;

pub use actor::{ActorKind, ActorState, Appearance};
pub use aura::{AuraApplication, AuraBehavior, AuraFlags, AuraSet};
pub use cast::{ActiveCast, CastCategory, CastSet, SpellTargets, TriggerMode};
pub use item::{Inventory, ItemInstance, LootEntry, LootPayload, SlotRef};
