//! Authority resolution: which actor is a session really acting through?
//!
//! The controlled-unit relation is weak and changes on mount/dismount,
//! possession, and vehicle entry/exit, so it is looked up fresh for every
//! request. A mismatch is ordinary staleness, not an offense: the client
//! fired the request before it learned about the control change.

use super::SessionContext;
use super::error::Rejection;
use crate::state::{ActorId, WorldState};

/// How a request kind treats remote control of another unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteControlPolicy {
    /// The session must be moving its own actor; anything else is stale.
    SelfOnly,
    /// Remote control is tolerated unless the mover is another *player*
    /// (casting through a remotely controlled player is never legal). The
    /// acting unit becomes the mover.
    UnitMover,
}

/// Resolves the unit the session is authorized to act through under the
/// given policy. Pure lookup plus a boolean gate; no side effects.
pub fn acting_unit(
    world: &WorldState,
    session: SessionContext,
    policy: RemoteControlPolicy,
) -> Result<ActorId, Rejection> {
    let mover = world.mover_of(session.player);

    match policy {
        RemoteControlPolicy::SelfOnly => {
            if mover != session.player {
                return Err(Rejection::Stale);
            }
            Ok(session.player)
        }
        RemoteControlPolicy::UnitMover => {
            if mover != session.player
                && world.actor(mover).is_none_or(|unit| unit.is_player())
            {
                return Err(Rejection::Stale);
            }
            Ok(mover)
        }
    }
}
