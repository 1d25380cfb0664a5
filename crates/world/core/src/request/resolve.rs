//! Concrete spell and caster resolution for cast requests.
//!
//! Applies, in order: difficulty-scoped definition lookup, vehicle-passenger
//! redirection, the known-spell gate, caster-specific override substitution,
//! and the passive/possession rejections. Level-scoped rank selection is a
//! separate step ([`rank_for_target`]) so the dispatcher can run the
//! auto-repeat resend suppression against the pre-rank definition.

use super::error::{ProtocolViolation, Rejection};
use super::{CastRequest, SessionContext, authority, eligibility};
use crate::env::{SpellAttributes, SpellDefinition, WorldEnv};
use crate::state::{ActorId, SpellTargets, TriggerMode, WorldState};

/// A cast request resolved to a concrete caster, definition, and target set.
#[derive(Clone, Debug)]
pub struct ResolvedCast {
    pub caster: ActorId,
    /// Post-override definition; rank selection not yet applied.
    pub def: SpellDefinition,
    pub trigger: TriggerMode,
    pub targets: SpellTargets,
}

/// Resolves a cast request against current world state.
pub fn resolve_cast(
    world: &WorldState,
    env: &WorldEnv<'_>,
    session: SessionContext,
    request: &CastRequest,
) -> Result<ResolvedCast, Rejection> {
    let mover_id = authority::acting_unit(world, session, authority::RemoteControlPolicy::UnitMover)?;
    let mover = world.actor(mover_id).ok_or(Rejection::Stale)?;

    let def = env
        .spells()?
        .definition(request.spell, mover.difficulty)
        .ok_or(ProtocolViolation::UnknownSpell {
            spell: request.spell,
        })?;

    // Vehicle-passenger redirection: a non-player mover that does not know
    // the spell may still carry the cast if the riding player is allowed to
    // cast their own spells through it.
    let mut caster_id = mover_id;
    if !mover.is_player() && !mover.knows_spell(def.id) {
        let player = world.actor(session.player).ok_or(Rejection::Stale)?;
        if !player.is_on_vehicle(mover_id)
            || !def
                .attributes
                .contains(SpellAttributes::VEHICLE_PASSENGER_CAST)
        {
            return Err(Rejection::Ignored);
        }
        caster_id = session.player;
    }

    let caster = world.actor(caster_id).ok_or(Rejection::Stale)?;
    let targets = request.targets.resolve();

    let trigger = eligibility::check_cast_permission(world, caster, &def, &targets)?;

    // caster-specific override substitution: current state may replace the
    // requested spell with a functionally different one it actually casts
    let def = match caster.auras.override_for(def.id) {
        Some(replacement) => env
            .spells()?
            .definition(replacement, caster.difficulty)
            .ok_or(ProtocolViolation::UnknownSpell {
                spell: replacement,
            })?,
        None => def,
    };

    if def.is_passive() {
        return Err(Rejection::Ignored);
    }

    // can't use our own spells while in possession of another unit
    let player = world.actor(session.player).ok_or(Rejection::Stale)?;
    if player.possessing {
        return Err(Rejection::Ignored);
    }

    Ok(ResolvedCast {
        caster: caster_id,
        def,
        trigger,
        targets,
    })
}

/// Level-scoped rank selection keyed to the explicit unit target.
///
/// When no ranked variant exists for the target's effective level, the
/// original definition is kept unmodified so later execution can surface a
/// proper "not usable on target" error instead of rejecting here.
pub fn rank_for_target(
    world: &WorldState,
    env: &WorldEnv<'_>,
    caster: ActorId,
    def: SpellDefinition,
    targets: &SpellTargets,
) -> Result<SpellDefinition, Rejection> {
    let Some(caster) = world.actor(caster) else {
        return Ok(def);
    };
    let Some(target) = targets.unit.and_then(|id| world.actor(id)) else {
        return Ok(def);
    };

    let ranked = env
        .spells()?
        .rank_for_level(def.id, caster.difficulty, target.level_for(caster));
    Ok(ranked.unwrap_or(def))
}
