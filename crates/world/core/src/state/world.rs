//! Shared world state and the entity directory.
//!
//! The directory methods are the only sanctioned way to turn a client-claimed
//! identity into a live reference. They scope lookups by visibility range and
//! resolve-or-treat-as-gone: a missing or out-of-range entity is simply
//! `None`, never an error.

use std::collections::BTreeMap;

use super::common::{ActorId, CastId, ObjectId, Position, SpellId};
use super::types::{ActorKind, ActorState};
use crate::config::WorldConfig;

/// A stationary interactive world object.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameObjectState {
    pub id: ObjectId,
    pub entry: u32,
    pub position: Position,
    pub lock_id: Option<u32>,
    /// Object explicitly supports interaction while mounted / remotely
    /// controlled.
    pub usable_mounted: bool,
    /// Spell that opens this object's lock for a given player, if any.
    /// Casting it is allowed even when the spell is otherwise unknown.
    pub unlock_spell: Option<SpellId>,
}

impl GameObjectState {
    pub fn new(id: ObjectId, entry: u32, position: Position) -> Self {
        Self {
            id,
            entry,
            position,
            lock_id: None,
            usable_mounted: false,
            unlock_spell: None,
        }
    }
}

/// Authoritative world state shared by all sessions.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldState {
    actors: BTreeMap<ActorId, ActorState>,
    objects: BTreeMap<ObjectId, GameObjectState>,
    /// Controlled-unit relation: which unit each player session currently
    /// moves. Looked up fresh per request; absent means self.
    movers: BTreeMap<ActorId, ActorId>,
    next_cast_id: u64,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Population
    // ========================================================================

    pub fn add_actor(&mut self, actor: ActorState) {
        self.actors.insert(actor.id, actor);
    }

    pub fn add_object(&mut self, object: GameObjectState) {
        self.objects.insert(object.id, object);
    }

    /// Removes an actor from the world entirely (death cleanup, unsummon).
    pub fn despawn(&mut self, id: ActorId) -> Option<ActorState> {
        self.actors.remove(&id)
    }

    // ========================================================================
    // Directory lookups
    // ========================================================================

    pub fn actor(&self, id: ActorId) -> Option<&ActorState> {
        self.actors.get(&id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut ActorState> {
        self.actors.get_mut(&id)
    }

    pub fn object(&self, id: ObjectId) -> Option<&GameObjectState> {
        self.objects.get(&id)
    }

    /// Resolves a unit the observer can currently see.
    pub fn find_unit(&self, observer: ActorId, id: ActorId) -> Option<&ActorState> {
        let observer = self.actors.get(&observer)?;
        let unit = self.actors.get(&id)?;
        unit.position
            .within(observer.position, WorldConfig::VISIBILITY_RANGE)
            .then_some(unit)
    }

    /// Resolves a creature, pet, vehicle, or totem (never a player) visible
    /// to the observer.
    pub fn find_creature(&self, observer: ActorId, id: ActorId) -> Option<&ActorState> {
        self.find_unit(observer, id)
            .filter(|unit| unit.kind != ActorKind::Player)
    }

    /// Resolves a world object the actor may interact with right now.
    ///
    /// Range only; line-of-sight is the map collaborator's concern.
    pub fn object_if_can_interact(
        &self,
        actor: ActorId,
        id: ObjectId,
    ) -> Option<&GameObjectState> {
        let actor = self.actors.get(&actor)?;
        let object = self.objects.get(&id)?;
        object
            .position
            .within(actor.position, WorldConfig::INTERACT_RANGE)
            .then_some(object)
    }

    // ========================================================================
    // Controlled-unit relation
    // ========================================================================

    /// The unit this player is currently moving. Defaults to the player
    /// itself when no remote-control relation is active.
    pub fn mover_of(&self, player: ActorId) -> ActorId {
        self.movers.get(&player).copied().unwrap_or(player)
    }

    pub fn set_mover(&mut self, player: ActorId, mover: ActorId) {
        if mover == player {
            self.movers.remove(&player);
        } else {
            self.movers.insert(player, mover);
        }
    }

    // ========================================================================
    // Cast identifiers
    // ========================================================================

    /// Allocates the next server-assigned cast id.
    pub fn allocate_cast_id(&mut self) -> CastId {
        self.next_cast_id += 1;
        CastId(self.next_cast_id)
    }
}
