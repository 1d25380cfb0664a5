//! Client-originated action requests and the validation/dispatch pipeline.
//!
//! # Pipeline
//!
//! Every inbound request flows through the same stages:
//! 1. [`authority`]: which unit is this session really acting through?
//! 2. [`eligibility`]: may that unit perform this action right now?
//! 3. [`resolve`]: which concrete spell definition and target set apply?
//! 4. [`dispatch`]: mutate world state and emit [`Directive`] values for
//!    the execution subsystems.
//!
//! The request type is a closed tagged variant dispatched through a single
//! match keyed by kind; each arm is an independent validation function plus
//! a side-effecting dispatch step. No stage caches a shared-entity reference
//! across the others: everything is re-fetched from [`WorldState`] at point
//! of use.

pub mod authority;
mod directive;
mod dispatch;
pub mod eligibility;
pub mod error;
pub mod resolve;
#[cfg(test)]
pub(crate) mod testutil;

pub use directive::{Directive, MirrorImageData, PetFeedback};
pub use error::{EquipError, IntegrityError, ProtocolViolation, Rejection};

use crate::env::WorldEnv;
use crate::state::{
    ActorId, CastId, ItemGuid, ObjectId, Position, SlotRef, SpellId, SpellTargets, WorldState,
};

/// The session on whose behalf a request is processed.
///
/// Holds only the session's primary actor; the controlled-unit relation is
/// looked up fresh per request because it can change between the moment a
/// client sends a request and the moment it is processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionContext {
    pub player: ActorId,
}

impl SessionContext {
    pub fn new(player: ActorId) -> Self {
        Self { player }
    }
}

/// Client-supplied target descriptor, not yet validated.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetDescriptor {
    pub unit: Option<ActorId>,
    pub object: Option<ObjectId>,
    pub dst: Option<Position>,
}

impl TargetDescriptor {
    pub fn unit(id: ActorId) -> Self {
        Self {
            unit: Some(id),
            ..Self::default()
        }
    }

    pub fn object(id: ObjectId) -> Self {
        Self {
            object: Some(id),
            ..Self::default()
        }
    }

    /// Builds the concrete target set consumed by later pipeline stages.
    pub fn resolve(&self) -> SpellTargets {
        SpellTargets {
            unit: self.unit,
            object: self.object,
            src: None,
            dst: self.dst,
            pitch: 0.0,
            speed: 0.0,
        }
    }
}

/// Movement-stop payload accompanying a cast or trajectory update.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveStop {
    pub position: Position,
}

/// Payload of a cast-spell request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastRequest {
    pub spell: SpellId,
    pub targets: TargetDescriptor,
    /// Opaque client correlation id, echoed in the cast-prepare ack.
    pub client_cast_id: u64,
    pub move_stop: Option<MoveStop>,
}

/// Payload of a use-item request.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UseItemRequest {
    pub slot: SlotRef,
    /// Claimed item identity; must match the instance found at `slot`.
    pub item: ItemGuid,
    pub cast: CastRequest,
}

/// Closed set of inbound request kinds, one per client action.
#[derive(Clone, Debug, PartialEq, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Request {
    UseItem(UseItemRequest),
    OpenItem {
        slot: SlotRef,
    },
    InteractObject {
        object: ObjectId,
    },
    ReportObjectUse {
        object: ObjectId,
    },
    CastSpell(CastRequest),
    CancelCast {
        spell: SpellId,
    },
    CancelChannel {
        spell: SpellId,
    },
    CancelAura {
        spell: SpellId,
        caster: Option<ActorId>,
    },
    PetCancelAura {
        pet: ActorId,
        spell: SpellId,
    },
    CancelScaleAuras,
    CancelMountAuras,
    CancelUncontrolledSpeedAuras {
        /// Claimed mover; must match the session's current mover.
        mover: ActorId,
    },
    CancelAutoRepeat,
    DestroySummon {
        slot: u8,
        summon: ActorId,
    },
    SelfResurrect {
        spell: SpellId,
    },
    SpellClick {
        target: ActorId,
    },
    QueryMirrorImage {
        target: ActorId,
    },
    MissileCollision {
        caster: ActorId,
        spell: SpellId,
        cast_id: CastId,
        position: Position,
    },
    MissileTrajectory {
        caster: ActorId,
        spell: SpellId,
        cast_id: CastId,
        src: Position,
        dst: Position,
        pitch: f32,
        speed: f32,
        move_stop: Option<MoveStop>,
    },
    KeyboundOverride {
        override_id: u32,
    },
}

impl Request {
    /// Snake-case kind name, used for logging and metrics keys.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// Authoritative validation and dispatch over a mutable world.
///
/// One pipeline instance is created per processed request batch; it borrows
/// the world exclusively, which is what makes validation and mutation a
/// single unsuspended step.
pub struct RequestPipeline<'a> {
    world: &'a mut WorldState,
}

impl<'a> RequestPipeline<'a> {
    pub fn new(world: &'a mut WorldState) -> Self {
        Self { world }
    }

    /// Validates and dispatches one request on behalf of a session.
    ///
    /// On success, returns the directives the runtime forwards to execution
    /// subsystems. On failure, returns the structured rejection; the world
    /// is left unmodified except for side effects that legitimately precede
    /// the failing check (binding flips, aura interrupts).
    pub fn process(
        &mut self,
        env: &WorldEnv<'_>,
        session: SessionContext,
        request: &Request,
    ) -> Result<Vec<Directive>, Rejection> {
        dispatch::dispatch(self.world, env, session, request)
    }
}
