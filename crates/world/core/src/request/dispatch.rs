//! Per-kind request handlers: the side-effecting dispatch step.
//!
//! Each handler runs the authority gate and the pure eligibility checks for
//! its kind, then mutates world state and emits the directives the runtime
//! forwards to execution subsystems. Mutation happens in the same
//! unsuspended step as validation, so every check is consistent by
//! construction.

use super::authority::{self, RemoteControlPolicy};
use super::directive::{Directive, MirrorImageData, PetFeedback};
use super::eligibility::{self, AuraCancelPath, OpenPath};
use super::error::{ProtocolViolation, Rejection};
use super::resolve;
use super::{CastRequest, Request, SessionContext, UseItemRequest};
use crate::config::WorldConfig;
use crate::env::{SpellAttributes, SpellDefinition, WorldEnv};
use crate::state::{
    ActiveCast, ActorId, ActorKind, AuraBehavior, CastCategory, CastId, ObjectId, Position,
    SlotRef, SpellId, SpellTargets, TriggerMode, WorldState,
};

/// Routes one request to its handler.
pub(super) fn dispatch(
    world: &mut WorldState,
    env: &WorldEnv<'_>,
    session: SessionContext,
    request: &Request,
) -> Result<Vec<Directive>, Rejection> {
    match request {
        Request::UseItem(req) => use_item(world, env, session, req),
        Request::OpenItem { slot } => open_item(world, env, session, *slot),
        Request::InteractObject { object } => interact_object(world, session, *object),
        Request::ReportObjectUse { object } => report_object_use(world, session, *object),
        Request::CastSpell(req) => cast_spell(world, env, session, req),
        Request::CancelCast { spell } => cancel_cast(world, session, *spell),
        Request::CancelChannel { spell } => cancel_channel(world, env, session, *spell),
        Request::CancelAura { spell, caster } => cancel_aura(world, env, session, *spell, *caster),
        Request::PetCancelAura { pet, spell } => pet_cancel_aura(world, env, session, *pet, *spell),
        Request::CancelScaleAuras => {
            cancel_aura_category(world, session, |b| *b == AuraBehavior::ModScale)
        }
        Request::CancelMountAuras => {
            cancel_aura_category(world, session, |b| *b == AuraBehavior::Mounted)
        }
        Request::CancelUncontrolledSpeedAuras { mover } => {
            if world.mover_of(session.player) != *mover {
                return Err(Rejection::Stale);
            }
            cancel_aura_category(world, session, |b| *b == AuraBehavior::ModSpeedUncontrolled)
        }
        Request::CancelAutoRepeat => cancel_auto_repeat(world, session),
        Request::DestroySummon { slot, summon } => {
            destroy_summon(world, session, *slot, *summon)
        }
        Request::SelfResurrect { spell } => self_resurrect(world, env, session, *spell),
        Request::SpellClick { target } => spell_click(world, session, *target),
        Request::QueryMirrorImage { target } => mirror_image(world, env, session, *target),
        Request::MissileCollision {
            caster,
            spell,
            cast_id,
            position,
        } => missile_collision(world, session, *caster, *spell, *cast_id, *position),
        Request::MissileTrajectory {
            caster,
            spell,
            cast_id,
            src,
            dst,
            pitch,
            speed,
            move_stop,
        } => missile_trajectory(
            world, session, *caster, *spell, *cast_id, *src, *dst, *pitch, *speed,
            move_stop.map(|s| s.position),
        ),
        Request::KeyboundOverride { override_id } => {
            keybound_override(world, env, session, *override_id)
        }
    }
}

// ============================================================================
// Cast registration
// ============================================================================

/// Registers a new cast on the caster and emits the prepare/begin directives.
///
/// The server-assigned cast id is always distinct from the client correlation
/// id; when one was supplied the two are paired in a cast-prepare ack so the
/// client can correlate. A cast displaced from its category slot is reported
/// as interrupted.
fn begin_cast(
    world: &mut WorldState,
    caster: ActorId,
    def: &SpellDefinition,
    targets: SpellTargets,
    trigger: TriggerMode,
    client_cast_id: Option<u64>,
) -> Result<Vec<Directive>, Rejection> {
    let cast_id = world.allocate_cast_id();
    let category = def.cast_category();

    let actor = world.actor_mut(caster).ok_or(Rejection::Stale)?;
    let displaced = actor.casts.begin(ActiveCast {
        cast_id,
        spell: def.id,
        category,
        targets: targets.clone(),
        trigger,
    });

    let mut directives = Vec::new();
    if let Some(previous) = displaced {
        directives.push(Directive::InterruptCast {
            actor: caster,
            category: previous.category,
            spell: previous.spell,
        });
    }
    if let Some(client_cast_id) = client_cast_id {
        directives.push(Directive::CastPrepare {
            client_cast_id,
            server_cast_id: cast_id,
        });
    }
    directives.push(Directive::BeginCast {
        caster,
        cast_id,
        spell: def.id,
        trigger,
        targets,
    });
    Ok(directives)
}

// ============================================================================
// Item handlers
// ============================================================================

fn use_item(
    world: &mut WorldState,
    env: &WorldEnv<'_>,
    session: SessionContext,
    request: &UseItemRequest,
) -> Result<Vec<Directive>, Rejection> {
    let user = authority::acting_unit(world, session, RemoteControlPolicy::SelfOnly)?;
    let actor = world.actor(user).ok_or(Rejection::Stale)?;

    let checks = eligibility::check_item_use(actor, env, request.slot, request.item)?;
    let difficulty = actor.difficulty;

    let mut directives = Vec::new();

    // binding flips before the cast; the collection tracker hears about it
    // even if the cast later fails
    if checks.needs_bind {
        let actor = world.actor_mut(user).ok_or(Rejection::Stale)?;
        if let Some(item) = actor.inventory.item_at_mut(request.slot) {
            item.bound = true;
        }
        directives.push(Directive::ItemBound {
            owner: user,
            item: request.item,
        });
    }

    // using an item breaks auras flagged for it
    {
        let actor = world.actor_mut(user).ok_or(Rejection::Stale)?;
        for spell in actor.auras.interrupt_on_item_use() {
            directives.push(Directive::AuraRemoved { actor: user, spell });
        }
    }

    // cast the item's granted effect, if it has one
    let Some(&effect) = checks.template.effects.first() else {
        return Ok(directives);
    };
    let def = env
        .spells()?
        .definition(effect, difficulty)
        .ok_or(ProtocolViolation::UnknownSpell { spell: effect })?;

    let targets = request.cast.targets.resolve();
    directives.extend(begin_cast(
        world,
        user,
        &def,
        targets,
        TriggerMode::Normal,
        Some(request.cast.client_cast_id),
    )?);
    Ok(directives)
}

fn open_item(
    world: &mut WorldState,
    env: &WorldEnv<'_>,
    session: SessionContext,
    slot: SlotRef,
) -> Result<Vec<Directive>, Rejection> {
    let user = authority::acting_unit(world, session, RemoteControlPolicy::SelfOnly)?;
    let actor = world.actor(user).ok_or(Rejection::Stale)?;

    let (item, path) = eligibility::check_open(actor, env, slot)?;

    Ok(vec![match path {
        OpenPath::Wrapped => Directive::OpenWrapped { slot, item },
        OpenPath::Container => Directive::OpenContainer { slot, item },
    }])
}

// ============================================================================
// Object handlers
// ============================================================================

fn interact_object(
    world: &mut WorldState,
    session: SessionContext,
    object: ObjectId,
) -> Result<Vec<Directive>, Rejection> {
    let player = world.actor(session.player).ok_or(Rejection::Stale)?;
    let object_state = world
        .object_if_can_interact(session.player, object)
        .ok_or(Rejection::Ignored)?;

    // remote control is tolerated only with vehicle/mount context, or when
    // the object explicitly supports mounted interaction
    let mover = world.mover_of(session.player);
    if mover != session.player
        && !(player.is_on_vehicle(mover) || player.mounted)
        && !object_state.usable_mounted
    {
        return Err(Rejection::Stale);
    }

    Ok(vec![Directive::UseObject {
        object,
        user: session.player,
    }])
}

fn report_object_use(
    world: &mut WorldState,
    session: SessionContext,
    object: ObjectId,
) -> Result<Vec<Directive>, Rejection> {
    authority::acting_unit(world, session, RemoteControlPolicy::SelfOnly)?;

    let object_state = world
        .object_if_can_interact(session.player, object)
        .ok_or(Rejection::Ignored)?;

    Ok(vec![Directive::ObjectUseReported {
        object,
        entry: object_state.entry,
        user: session.player,
    }])
}

// ============================================================================
// Cast handlers
// ============================================================================

fn cast_spell(
    world: &mut WorldState,
    env: &WorldEnv<'_>,
    session: SessionContext,
    request: &CastRequest,
) -> Result<Vec<Directive>, Rejection> {
    let resolved = resolve::resolve_cast(world, env, session, request)?;

    // The client resends the auto-repeat opcode when another spell fires
    // during the shoot rotation. Skip the resend so it does not read as an
    // interrupt; a changed target still restarts the cast.
    let caster_state = world.actor(resolved.caster).ok_or(Rejection::Stale)?;
    if resolved.def.is_auto_repeat()
        && let Some(current) = caster_state.casts.current(CastCategory::AutoRepeat)
        && current.spell == resolved.def.id
        && current.targets.unit == resolved.targets.unit
    {
        return Ok(Vec::new());
    }

    let def = resolve::rank_for_target(world, env, resolved.caster, resolved.def, &resolved.targets)?;

    // accompanying movement state applies before the cast begins
    if let Some(stop) = request.move_stop {
        let mover = world.mover_of(session.player);
        if let Some(actor) = world.actor_mut(mover) {
            actor.position = stop.position;
        }
    }

    begin_cast(
        world,
        resolved.caster,
        &def,
        resolved.targets,
        resolved.trigger,
        Some(request.client_cast_id),
    )
}

fn cancel_cast(
    world: &mut WorldState,
    session: SessionContext,
    spell: SpellId,
) -> Result<Vec<Directive>, Rejection> {
    let actor = world.actor_mut(session.player).ok_or(Rejection::Stale)?;

    let mut directives = Vec::new();
    for category in [CastCategory::Generic, CastCategory::Channeled] {
        // always re-fetch the active cast; interrupt only on identity match
        let matches = actor
            .casts
            .current(category)
            .is_some_and(|cast| cast.spell == spell);
        if matches && let Some(cast) = actor.casts.interrupt(category) {
            directives.push(Directive::InterruptCast {
                actor: session.player,
                category,
                spell: cast.spell,
            });
        }
    }
    Ok(directives)
}

fn cancel_channel(
    world: &mut WorldState,
    env: &WorldEnv<'_>,
    session: SessionContext,
    spell: SpellId,
) -> Result<Vec<Directive>, Rejection> {
    let mover_id = authority::acting_unit(world, session, RemoteControlPolicy::UnitMover)?;
    let mover = world.actor(mover_id).ok_or(Rejection::Stale)?;

    let def = env
        .spells()?
        .definition(spell, mover.difficulty)
        .ok_or(ProtocolViolation::UnknownSpell { spell })?;
    if !def.player_cancelable_aura() {
        return Err(Rejection::Ignored);
    }

    // a mismatched claim leaves the active channel untouched
    let matches = mover
        .casts
        .current(CastCategory::Channeled)
        .is_some_and(|cast| cast.spell == def.id);
    if !matches {
        return Ok(Vec::new());
    }

    let mover = world.actor_mut(mover_id).ok_or(Rejection::Stale)?;
    if let Some(cast) = mover.casts.interrupt(CastCategory::Channeled) {
        return Ok(vec![Directive::InterruptCast {
            actor: mover_id,
            category: CastCategory::Channeled,
            spell: cast.spell,
        }]);
    }
    Ok(Vec::new())
}

fn cancel_auto_repeat(
    world: &mut WorldState,
    session: SessionContext,
) -> Result<Vec<Directive>, Rejection> {
    let actor = world.actor_mut(session.player).ok_or(Rejection::Stale)?;
    if let Some(cast) = actor.casts.interrupt(CastCategory::AutoRepeat) {
        return Ok(vec![Directive::InterruptCast {
            actor: session.player,
            category: CastCategory::AutoRepeat,
            spell: cast.spell,
        }]);
    }
    Ok(Vec::new())
}

// ============================================================================
// Aura handlers
// ============================================================================

fn cancel_aura(
    world: &mut WorldState,
    env: &WorldEnv<'_>,
    session: SessionContext,
    spell: SpellId,
    caster: Option<ActorId>,
) -> Result<Vec<Directive>, Rejection> {
    let actor = world.actor(session.player).ok_or(Rejection::Stale)?;
    let def = env
        .spells()?
        .definition(spell, actor.difficulty)
        .ok_or(ProtocolViolation::UnknownSpell { spell })?;

    match eligibility::check_aura_cancel(&def)? {
        AuraCancelPath::Channeled => {
            // channeled spells cancel through the channel slot, and only if
            // the currently channeled spell is the claimed one
            let matches = actor
                .casts
                .current(CastCategory::Channeled)
                .is_some_and(|cast| cast.spell == def.id);
            if !matches {
                return Ok(Vec::new());
            }
            let actor = world.actor_mut(session.player).ok_or(Rejection::Stale)?;
            if let Some(cast) = actor.casts.interrupt(CastCategory::Channeled) {
                return Ok(vec![Directive::InterruptCast {
                    actor: session.player,
                    category: CastCategory::Channeled,
                    spell: cast.spell,
                }]);
            }
            Ok(Vec::new())
        }
        AuraCancelPath::Removal => {
            let actor = world.actor_mut(session.player).ok_or(Rejection::Stale)?;
            if actor.auras.remove_owned(spell, caster) {
                Ok(vec![Directive::AuraRemoved {
                    actor: session.player,
                    spell,
                }])
            } else {
                Ok(Vec::new())
            }
        }
    }
}

fn pet_cancel_aura(
    world: &mut WorldState,
    env: &WorldEnv<'_>,
    session: SessionContext,
    pet: ActorId,
    spell: SpellId,
) -> Result<Vec<Directive>, Rejection> {
    if env
        .spells()?
        .definition(spell, crate::state::Difficulty::Normal)
        .is_none()
    {
        return Err(ProtocolViolation::UnknownPetSpell { spell }.into());
    }

    let unit = world
        .find_creature(session.player, pet)
        .ok_or(Rejection::Protocol(ProtocolViolation::NotOwnedPet { pet }))?;

    if unit.owner != Some(session.player) && unit.charmer != Some(session.player) {
        return Err(ProtocolViolation::NotOwnedPet { pet }.into());
    }

    if !unit.alive {
        return Ok(vec![Directive::PetFeedback {
            pet,
            feedback: PetFeedback::Dead,
        }]);
    }

    let unit = world.actor_mut(pet).ok_or(Rejection::Stale)?;
    if unit.auras.remove_owned(spell, None) {
        Ok(vec![Directive::AuraRemoved { actor: pet, spell }])
    } else {
        Ok(Vec::new())
    }
}

/// Bulk category cancel: every player-cancelable matching aura is removed,
/// independently per aura; protected ones stay.
fn cancel_aura_category(
    world: &mut WorldState,
    session: SessionContext,
    behavior: impl FnMut(&AuraBehavior) -> bool,
) -> Result<Vec<Directive>, Rejection> {
    let actor = world.actor_mut(session.player).ok_or(Rejection::Stale)?;
    let removed = actor.auras.cancel_matching(behavior);
    Ok(removed
        .into_iter()
        .map(|spell| Directive::AuraRemoved {
            actor: session.player,
            spell,
        })
        .collect())
}

// ============================================================================
// Summon / resurrection handlers
// ============================================================================

fn destroy_summon(
    world: &mut WorldState,
    session: SessionContext,
    slot: u8,
    claimed: ActorId,
) -> Result<Vec<Directive>, Rejection> {
    authority::acting_unit(world, session, RemoteControlPolicy::SelfOnly)?;

    let slot = slot as usize;
    if slot >= WorldConfig::MAX_TOTEM_SLOTS {
        return Ok(Vec::new());
    }

    let actor = world.actor(session.player).ok_or(Rejection::Stale)?;
    let Some(summon) = actor.summon_slots[slot] else {
        return Ok(Vec::new());
    };

    // slot must hold a live totem whose identity matches the claim
    let matches = world
        .find_creature(session.player, summon)
        .is_some_and(|unit| unit.kind == ActorKind::Totem && unit.id == claimed && unit.alive);
    if !matches {
        return Ok(Vec::new());
    }

    if let Some(actor) = world.actor_mut(session.player) {
        actor.summon_slots[slot] = None;
    }
    world.despawn(summon);
    Ok(vec![Directive::Unsummoned { summon }])
}

fn self_resurrect(
    world: &mut WorldState,
    env: &WorldEnv<'_>,
    session: SessionContext,
    spell: SpellId,
) -> Result<Vec<Directive>, Rejection> {
    let actor = world.actor(session.player).ok_or(Rejection::Stale)?;

    if !actor.self_res_spells.contains(&spell) {
        return Err(Rejection::Ignored);
    }

    let def = env
        .spells()?
        .definition(spell, actor.difficulty)
        .ok_or(ProtocolViolation::UnknownSpell { spell })?;

    // silent: the client is expected to suppress this itself
    if actor.auras.prevents_resurrection()
        && !def
            .attributes
            .contains(SpellAttributes::BYPASS_RESURRECTION_PREVENTION)
    {
        return Ok(Vec::new());
    }

    let targets = SpellTargets {
        unit: Some(session.player),
        ..SpellTargets::default()
    };
    let directives = begin_cast(
        world,
        session.player,
        &def,
        targets,
        TriggerMode::Normal,
        None,
    )?;

    // one-shot grant
    if let Some(actor) = world.actor_mut(session.player) {
        actor.self_res_spells.retain(|granted| *granted != spell);
    }
    Ok(directives)
}

// ============================================================================
// Interaction / query handlers
// ============================================================================

fn spell_click(
    world: &mut WorldState,
    session: SessionContext,
    target: ActorId,
) -> Result<Vec<Directive>, Rejection> {
    let unit = world
        .find_creature(session.player, target)
        .ok_or(Rejection::Ignored)?;

    Ok(vec![Directive::SpellClick {
        target: unit.id,
        clicker: session.player,
    }])
}

fn mirror_image(
    world: &mut WorldState,
    env: &WorldEnv<'_>,
    session: SessionContext,
    target: ActorId,
) -> Result<Vec<Directive>, Rejection> {
    let unit = world
        .find_unit(session.player, target)
        .ok_or(Rejection::Ignored)?;

    // clone-caster does not stack; the first application's caster is the
    // creator. The back-reference is weak: a despawned creator means no data.
    let creator = unit.auras.clone_caster_source().ok_or(Rejection::Ignored)?;
    let creator = world.actor(creator).ok_or(Rejection::Ignored)?;

    let data = if creator.is_player() {
        let items = env.items()?;
        let mut item_display_ids = vec![0u32; WorldConfig::VISIBLE_EQUIPMENT_SLOTS];
        for (slot, item) in creator.inventory.equipped() {
            if let Some(display) = item_display_ids.get_mut(slot as usize)
                && let Some(template) = items.template(item.entry)
            {
                *display = template.display_id;
            }
        }
        MirrorImageData::Humanoid {
            unit: target,
            display_id: creator.appearance.display_id,
            race: creator.appearance.race,
            gender: creator.appearance.gender,
            class: creator.appearance.class,
            customizations: creator.appearance.customizations.clone(),
            guild: creator.appearance.guild,
            item_display_ids,
        }
    } else {
        MirrorImageData::Creature {
            unit: target,
            display_id: creator.appearance.display_id,
        }
    };

    Ok(vec![Directive::MirrorImage(data)])
}

// ============================================================================
// Missile handlers
// ============================================================================

fn missile_collision(
    world: &mut WorldState,
    session: SessionContext,
    caster: ActorId,
    spell: SpellId,
    cast_id: CastId,
    position: Position,
) -> Result<Vec<Directive>, Rejection> {
    if world.find_unit(session.player, caster).is_none() {
        return Err(Rejection::Ignored);
    }

    let actor = world.actor_mut(caster).ok_or(Rejection::Ignored)?;
    let Some(cast) = actor.casts.find_by_spell_mut(spell) else {
        return Err(Rejection::Ignored);
    };
    if !cast.targets.has_dst() {
        return Err(Rejection::Ignored);
    }

    // destination changed; the engine recomputes flight time from the
    // broadcast position
    cast.targets.dst = Some(position);

    Ok(vec![Directive::MissileCollisionBroadcast {
        caster,
        cast_id,
        position,
    }])
}

#[allow(clippy::too_many_arguments)]
fn missile_trajectory(
    world: &mut WorldState,
    session: SessionContext,
    caster: ActorId,
    spell: SpellId,
    cast_id: CastId,
    src: Position,
    dst: Position,
    pitch: f32,
    speed: f32,
    move_stop: Option<Position>,
) -> Result<Vec<Directive>, Rejection> {
    if world.find_unit(session.player, caster).is_none() {
        return Err(Rejection::Ignored);
    }

    {
        let actor = world.actor_mut(caster).ok_or(Rejection::Ignored)?;
        let Some(cast) = actor.casts.current_mut(CastCategory::Generic) else {
            return Err(Rejection::Ignored);
        };
        if cast.spell != spell
            || cast.cast_id != cast_id
            || !cast.targets.has_dst()
            || !cast.targets.has_src()
        {
            return Err(Rejection::Ignored);
        }

        cast.targets.src = Some(src);
        cast.targets.dst = Some(dst);
        cast.targets.pitch = pitch;
        cast.targets.speed = speed;
    }

    if let Some(position) = move_stop {
        let mover = world.mover_of(session.player);
        if let Some(actor) = world.actor_mut(mover) {
            actor.position = position;
        }
    }

    Ok(Vec::new())
}

// ============================================================================
// Keybound overrides
// ============================================================================

fn keybound_override(
    world: &mut WorldState,
    env: &WorldEnv<'_>,
    session: SessionContext,
    override_id: u32,
) -> Result<Vec<Directive>, Rejection> {
    let actor = world.actor(session.player).ok_or(Rejection::Stale)?;
    if !actor.auras.has_keybound_override(override_id) {
        return Err(Rejection::Ignored);
    }

    let spell = env
        .spells()?
        .keybound_override(override_id)
        .ok_or(ProtocolViolation::UnknownOverride { override_id })?;
    let def = env
        .spells()?
        .definition(spell, actor.difficulty)
        .ok_or(ProtocolViolation::UnknownSpell { spell })?;

    let targets = SpellTargets {
        unit: Some(session.player),
        ..SpellTargets::default()
    };
    begin_cast(
        world,
        session.player,
        &def,
        targets,
        TriggerMode::Normal,
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::super::testutil::{FixtureRegistry, player_world, process};
    use super::*;
    use crate::env::{BondingPolicy, InventoryKind, ItemClass, ItemTemplate, ItemTemplateFlags};
    use crate::request::error::{EquipError, IntegrityError};
    use crate::request::{CastRequest, Request, TargetDescriptor, UseItemRequest};
    use crate::state::{ActorState, AuraApplication, AuraFlags, ItemGuid, ItemInstance};

    fn use_item_request(slot: SlotRef, item: u64, spell: u32) -> Request {
        Request::UseItem(UseItemRequest {
            slot,
            item: ItemGuid(item),
            cast: CastRequest {
                spell: SpellId(spell),
                targets: TargetDescriptor::default(),
                client_cast_id: 77,
                move_stop: None,
            },
        })
    }

    fn consumable(entry: u32, effect: u32) -> ItemTemplate {
        let mut template = ItemTemplate::new(entry, ItemClass::Consumable);
        template.effects = vec![SpellId(effect)];
        template
    }

    // ------------------------------------------------------------------
    // use-item
    // ------------------------------------------------------------------

    #[test]
    fn equip_required_item_rejected_unless_equipped() {
        let (mut world, session) = player_world();
        let mut template = ItemTemplate::new(100, ItemClass::Weapon);
        template.inventory_kind = InventoryKind::Equip;
        template.effects = vec![SpellId(10)];
        let registry = FixtureRegistry::new()
            .item(template)
            .spell(10, SpellAttributes::USABLE_IN_COMBAT);

        let bag_slot = SlotRef::new(0, 0);
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .inventory
            .insert(bag_slot, ItemInstance::new(ItemGuid(5), 100));

        let err = process(&mut world, &registry, session, use_item_request(bag_slot, 5, 10))
            .unwrap_err();
        assert_eq!(err, Rejection::Rule(EquipError::ItemNotFound));

        // equipped copy works
        let equip_slot = SlotRef::equipment(0);
        let item = world
            .actor_mut(ActorId(1))
            .unwrap()
            .inventory
            .remove(bag_slot)
            .unwrap();
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .inventory
            .insert(equip_slot, item);
        let directives =
            process(&mut world, &registry, session, use_item_request(equip_slot, 5, 10)).unwrap();
        assert!(directives
            .iter()
            .any(|d| matches!(d, Directive::BeginCast { spell, .. } if *spell == SpellId(10))));
    }

    #[test]
    fn claimed_identity_must_match_slot_contents() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().item(consumable(100, 10));
        let slot = SlotRef::new(0, 0);
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .inventory
            .insert(slot, ItemInstance::new(ItemGuid(5), 100));

        let err =
            process(&mut world, &registry, session, use_item_request(slot, 999, 10)).unwrap_err();
        assert_eq!(err, Rejection::Rule(EquipError::ItemNotFound));
    }

    #[test]
    fn combat_usable_bandage_proceeds_in_combat() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new()
            .item(consumable(100, 10))
            .spell(10, SpellAttributes::USABLE_IN_COMBAT | SpellAttributes::POSITIVE);
        let slot = SlotRef::new(0, 0);
        {
            let actor = world.actor_mut(ActorId(1)).unwrap();
            actor.in_combat = true;
            actor
                .inventory
                .insert(slot, ItemInstance::new(ItemGuid(5), 100));
        }

        let directives =
            process(&mut world, &registry, session, use_item_request(slot, 5, 10)).unwrap();
        assert!(directives
            .iter()
            .any(|d| matches!(d, Directive::BeginCast { .. })));
    }

    #[test]
    fn non_combat_item_rejected_in_combat() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new()
            .item(consumable(100, 10))
            .spell(10, SpellAttributes::POSITIVE);
        let slot = SlotRef::new(0, 0);
        {
            let actor = world.actor_mut(ActorId(1)).unwrap();
            actor.in_combat = true;
            actor
                .inventory
                .insert(slot, ItemInstance::new(ItemGuid(5), 100));
        }

        let err =
            process(&mut world, &registry, session, use_item_request(slot, 5, 10)).unwrap_err();
        assert_eq!(err, Rejection::Rule(EquipError::NotInCombat));
    }

    #[test]
    fn consumable_blocked_in_ranked_match_unless_exempt() {
        let (mut world, session) = player_world();
        let mut exempt = consumable(200, 10);
        exempt.flags = ItemTemplateFlags::IGNORE_ARENA_RESTRICTIONS;
        let registry = FixtureRegistry::new()
            .item(consumable(100, 10))
            .item(exempt)
            .spell(10, SpellAttributes::USABLE_IN_COMBAT);

        let slot_a = SlotRef::new(0, 0);
        let slot_b = SlotRef::new(0, 1);
        {
            let actor = world.actor_mut(ActorId(1)).unwrap();
            actor.in_arena = true;
            actor
                .inventory
                .insert(slot_a, ItemInstance::new(ItemGuid(5), 100));
            actor
                .inventory
                .insert(slot_b, ItemInstance::new(ItemGuid(6), 200));
        }

        let err =
            process(&mut world, &registry, session, use_item_request(slot_a, 5, 10)).unwrap_err();
        assert_eq!(err, Rejection::Rule(EquipError::NotDuringRankedMatch));

        assert!(process(&mut world, &registry, session, use_item_request(slot_b, 6, 10)).is_ok());
    }

    #[test]
    fn bind_on_use_flips_binding_and_notifies() {
        let (mut world, session) = player_world();
        let mut template = consumable(100, 10);
        template.bonding = BondingPolicy::OnUse;
        let registry = FixtureRegistry::new()
            .item(template)
            .spell(10, SpellAttributes::USABLE_IN_COMBAT);
        let slot = SlotRef::new(0, 0);
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .inventory
            .insert(slot, ItemInstance::new(ItemGuid(5), 100));

        let directives =
            process(&mut world, &registry, session, use_item_request(slot, 5, 10)).unwrap();
        assert!(directives
            .iter()
            .any(|d| matches!(d, Directive::ItemBound { item, .. } if *item == ItemGuid(5))));
        assert!(
            world
                .actor(ActorId(1))
                .unwrap()
                .inventory
                .item_at(slot)
                .unwrap()
                .bound
        );

        // second use: already bound, no second notification
        let directives =
            process(&mut world, &registry, session, use_item_request(slot, 5, 10)).unwrap();
        assert!(!directives.iter().any(|d| matches!(d, Directive::ItemBound { .. })));
    }

    #[test]
    fn remote_controlled_session_cannot_use_items() {
        let (mut world, session) = player_world();
        world.add_actor(ActorState::new(
            ActorId(2),
            ActorKind::Creature,
            crate::state::Position::ORIGIN,
        ));
        world.set_mover(ActorId(1), ActorId(2));
        let registry = FixtureRegistry::new().item(consumable(100, 10));

        let err = process(
            &mut world,
            &registry,
            session,
            use_item_request(SlotRef::new(0, 0), 5, 10),
        )
        .unwrap_err();
        assert_eq!(err, Rejection::Stale);
    }

    // ------------------------------------------------------------------
    // open-item
    // ------------------------------------------------------------------

    #[test]
    fn opening_non_openable_item_is_a_protocol_violation() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().item(ItemTemplate::new(100, ItemClass::Misc));
        let slot = SlotRef::new(0, 0);
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .inventory
            .insert(slot, ItemInstance::new(ItemGuid(5), 100));

        let err = process(&mut world, &registry, session, Request::OpenItem { slot }).unwrap_err();
        assert!(matches!(
            err,
            Rejection::Protocol(ProtocolViolation::NotOpenable { .. })
        ));
    }

    #[test]
    fn open_lock_checks_distinguish_unknown_from_locked() {
        let (mut world, session) = player_world();
        let mut template = ItemTemplate::new(100, ItemClass::Container);
        template.flags = ItemTemplateFlags::HAS_LOOT;
        template.lock_id = Some(33);
        let slot = SlotRef::new(0, 0);
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .inventory
            .insert(slot, ItemInstance::new(ItemGuid(5), 100).locked());

        // lock id not in the registry: data integrity, not "locked"
        let registry = FixtureRegistry::new().item(template.clone());
        let err = process(&mut world, &registry, session, Request::OpenItem { slot }).unwrap_err();
        assert!(matches!(
            err,
            Rejection::Integrity(IntegrityError::UnknownLock { lock_id: 33, .. })
        ));

        // known lock but still locked
        let registry = FixtureRegistry::new().item(template).lock(33);
        let err = process(&mut world, &registry, session, Request::OpenItem { slot }).unwrap_err();
        assert_eq!(err, Rejection::Rule(EquipError::AlreadyLocked));
    }

    #[test]
    fn open_routes_wrapped_and_container_paths() {
        let (mut world, session) = player_world();
        let mut container = ItemTemplate::new(100, ItemClass::Container);
        container.flags = ItemTemplateFlags::HAS_LOOT;
        let registry = FixtureRegistry::new()
            .item(container)
            .item(ItemTemplate::new(200, ItemClass::Misc));

        let container_slot = SlotRef::new(0, 0);
        let gift_slot = SlotRef::new(0, 1);
        {
            let actor = world.actor_mut(ActorId(1)).unwrap();
            actor
                .inventory
                .insert(container_slot, ItemInstance::new(ItemGuid(5), 100));
            actor.inventory.insert(
                gift_slot,
                ItemInstance::new(ItemGuid(6), 200).wrapped(ActorId(9)),
            );
        }

        let directives = process(
            &mut world,
            &registry,
            session,
            Request::OpenItem { slot: container_slot },
        )
        .unwrap();
        assert_eq!(
            directives,
            vec![Directive::OpenContainer {
                slot: container_slot,
                item: ItemGuid(5)
            }]
        );

        let directives = process(
            &mut world,
            &registry,
            session,
            Request::OpenItem { slot: gift_slot },
        )
        .unwrap();
        assert_eq!(
            directives,
            vec![Directive::OpenWrapped {
                slot: gift_slot,
                item: ItemGuid(6)
            }]
        );
    }

    #[test]
    fn dead_actor_cannot_open() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new();
        world.actor_mut(ActorId(1)).unwrap().alive = false;

        let err = process(
            &mut world,
            &registry,
            session,
            Request::OpenItem { slot: SlotRef::new(0, 0) },
        )
        .unwrap_err();
        assert_eq!(err, Rejection::Rule(EquipError::PlayerDead));
    }

    // ------------------------------------------------------------------
    // cast-spell
    // ------------------------------------------------------------------

    fn cast(spell: u32) -> Request {
        Request::CastSpell(CastRequest {
            spell: SpellId(spell),
            targets: TargetDescriptor::default(),
            client_cast_id: 42,
            move_stop: None,
        })
    }

    #[test]
    fn unknown_spell_is_a_protocol_violation() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new();

        let err = process(&mut world, &registry, session, cast(10)).unwrap_err();
        assert!(matches!(
            err,
            Rejection::Protocol(ProtocolViolation::UnknownSpell { .. })
        ));
    }

    #[test]
    fn unknown_to_caster_spell_is_dropped() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().spell(10, SpellAttributes::empty());

        let err = process(&mut world, &registry, session, cast(10)).unwrap_err();
        assert_eq!(err, Rejection::Ignored);
    }

    #[test]
    fn cast_prepare_pairs_client_and_server_ids() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().spell(10, SpellAttributes::empty());
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .known_spells
            .insert(SpellId(10));

        let directives = process(&mut world, &registry, session, cast(10)).unwrap();
        let Some(Directive::CastPrepare {
            client_cast_id,
            server_cast_id,
        }) = directives
            .iter()
            .find(|d| matches!(d, Directive::CastPrepare { .. }))
        else {
            panic!("missing cast-prepare ack");
        };
        assert_eq!(*client_cast_id, 42);
        assert_ne!(server_cast_id.0, 42);

        // the cast occupies the generic slot
        let actor = world.actor(ActorId(1)).unwrap();
        assert_eq!(
            actor.casts.current(CastCategory::Generic).unwrap().spell,
            SpellId(10)
        );
    }

    #[test]
    fn raid_marker_spell_castable_without_knowing_it() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().spell(10, SpellAttributes::RAID_MARKER);

        assert!(process(&mut world, &registry, session, cast(10)).is_ok());
    }

    #[test]
    fn client_trigger_grant_marks_cast_system_triggered() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().spell(10, SpellAttributes::empty());
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .auras
            .apply(AuraApplication {
                spell: SpellId(99),
                behavior: AuraBehavior::ClientTriggerSpell(SpellId(10)),
                caster: None,
                flags: AuraFlags::POSITIVE,
            });

        let directives = process(&mut world, &registry, session, cast(10)).unwrap();
        assert!(directives.iter().any(|d| matches!(
            d,
            Directive::BeginCast {
                trigger: TriggerMode::System,
                ..
            }
        )));
    }

    #[test]
    fn passive_spell_never_castable() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().spell(10, SpellAttributes::PASSIVE);
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .known_spells
            .insert(SpellId(10));

        assert_eq!(
            process(&mut world, &registry, session, cast(10)).unwrap_err(),
            Rejection::Ignored
        );
    }

    #[test]
    fn possessing_actor_cannot_cast_through_itself() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().spell(10, SpellAttributes::empty());
        {
            let actor = world.actor_mut(ActorId(1)).unwrap();
            actor.known_spells.insert(SpellId(10));
            actor.possessing = true;
        }

        assert_eq!(
            process(&mut world, &registry, session, cast(10)).unwrap_err(),
            Rejection::Ignored
        );
    }

    #[test]
    fn override_substitutes_the_cast_spell() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new()
            .spell(10, SpellAttributes::empty())
            .spell(20, SpellAttributes::empty());
        {
            let actor = world.actor_mut(ActorId(1)).unwrap();
            actor.known_spells.insert(SpellId(10));
            actor.auras.apply(AuraApplication {
                spell: SpellId(50),
                behavior: AuraBehavior::OverrideSpell {
                    original: SpellId(10),
                    replacement: SpellId(20),
                },
                caster: None,
                flags: AuraFlags::POSITIVE,
            });
        }

        let directives = process(&mut world, &registry, session, cast(10)).unwrap();
        assert!(directives
            .iter()
            .any(|d| matches!(d, Directive::BeginCast { spell, .. } if *spell == SpellId(20))));
    }

    #[test]
    fn rank_selection_keys_off_target_level() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new()
            .spell(10, SpellAttributes::POSITIVE)
            .spell(11, SpellAttributes::POSITIVE)
            .rank(10, 20, 11);
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .known_spells
            .insert(SpellId(10));
        world.add_actor(
            ActorState::new(ActorId(2), ActorKind::Player, crate::state::Position::ORIGIN)
                .with_level(15),
        );
        world.add_actor(
            ActorState::new(ActorId(3), ActorKind::Player, crate::state::Position::ORIGIN)
                .with_level(60),
        );

        let low = Request::CastSpell(CastRequest {
            spell: SpellId(10),
            targets: TargetDescriptor::unit(ActorId(2)),
            client_cast_id: 1,
            move_stop: None,
        });
        let directives = process(&mut world, &registry, session, low).unwrap();
        assert!(directives
            .iter()
            .any(|d| matches!(d, Directive::BeginCast { spell, .. } if *spell == SpellId(11))));

        // no ranked variant for a level-60 target: the original is kept
        let high = Request::CastSpell(CastRequest {
            spell: SpellId(10),
            targets: TargetDescriptor::unit(ActorId(3)),
            client_cast_id: 2,
            move_stop: None,
        });
        let directives = process(&mut world, &registry, session, high).unwrap();
        assert!(directives
            .iter()
            .any(|d| matches!(d, Directive::BeginCast { spell, .. } if *spell == SpellId(10))));
    }

    #[test]
    fn auto_repeat_resend_is_suppressed() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().spell(10, SpellAttributes::AUTO_REPEAT);
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .known_spells
            .insert(SpellId(10));
        world.add_actor(ActorState::new(
            ActorId(2),
            ActorKind::Creature,
            crate::state::Position::ORIGIN,
        ));

        let request = Request::CastSpell(CastRequest {
            spell: SpellId(10),
            targets: TargetDescriptor::unit(ActorId(2)),
            client_cast_id: 1,
            move_stop: None,
        });
        let first = process(&mut world, &registry, session, request.clone()).unwrap();
        assert!(!first.is_empty());

        // identical resend: swallowed entirely
        let resend = process(&mut world, &registry, session, request).unwrap();
        assert!(resend.is_empty());

        // same spell, different target: restarts the cast
        world.add_actor(ActorState::new(
            ActorId(3),
            ActorKind::Creature,
            crate::state::Position::ORIGIN,
        ));
        let retarget = Request::CastSpell(CastRequest {
            spell: SpellId(10),
            targets: TargetDescriptor::unit(ActorId(3)),
            client_cast_id: 2,
            move_stop: None,
        });
        let directives = process(&mut world, &registry, session, retarget).unwrap();
        assert!(directives
            .iter()
            .any(|d| matches!(d, Directive::InterruptCast { .. })));
    }

    #[test]
    fn vehicle_passenger_cast_redirects_to_player() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new()
            .spell(10, SpellAttributes::VEHICLE_PASSENGER_CAST)
            .spell(11, SpellAttributes::empty());
        world.add_actor(ActorState::new(
            ActorId(2),
            ActorKind::Vehicle,
            crate::state::Position::ORIGIN,
        ));
        {
            let player = world.actor_mut(ActorId(1)).unwrap();
            player.known_spells.insert(SpellId(10));
            player.known_spells.insert(SpellId(11));
            player.vehicle = Some(ActorId(2));
        }
        world.set_mover(ActorId(1), ActorId(2));

        // allowed spell: the player becomes the effective caster
        let directives = process(&mut world, &registry, session, cast(10)).unwrap();
        assert!(directives
            .iter()
            .any(|d| matches!(d, Directive::BeginCast { caster, .. } if *caster == ActorId(1))));

        // spell without the passenger attribute: dropped
        assert_eq!(
            process(&mut world, &registry, session, cast(11)).unwrap_err(),
            Rejection::Ignored
        );
    }

    #[test]
    fn move_stop_applies_before_cast() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().spell(10, SpellAttributes::empty());
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .known_spells
            .insert(SpellId(10));

        let request = Request::CastSpell(CastRequest {
            spell: SpellId(10),
            targets: TargetDescriptor::default(),
            client_cast_id: 1,
            move_stop: Some(crate::request::MoveStop {
                position: Position::new(3.0, 4.0, 0.0),
            }),
        });
        process(&mut world, &registry, session, request).unwrap();
        assert_eq!(
            world.actor(ActorId(1)).unwrap().position,
            Position::new(3.0, 4.0, 0.0)
        );
    }

    // ------------------------------------------------------------------
    // cancellation
    // ------------------------------------------------------------------

    #[test]
    fn channeled_cancel_requires_matching_identity() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new()
            .spell(10, SpellAttributes::CHANNELED | SpellAttributes::POSITIVE)
            .spell(11, SpellAttributes::CHANNELED | SpellAttributes::POSITIVE);
        {
            let actor = world.actor_mut(ActorId(1)).unwrap();
            actor.known_spells.insert(SpellId(10));
        }
        process(&mut world, &registry, session, cast(10)).unwrap();

        // mismatched claim: the channel stays
        let directives = process(
            &mut world,
            &registry,
            session,
            Request::CancelChannel { spell: SpellId(11) },
        )
        .unwrap();
        assert!(directives.is_empty());
        assert!(world
            .actor(ActorId(1))
            .unwrap()
            .casts
            .current(CastCategory::Channeled)
            .is_some());

        // matching claim interrupts
        let directives = process(
            &mut world,
            &registry,
            session,
            Request::CancelChannel { spell: SpellId(10) },
        )
        .unwrap();
        assert_eq!(directives.len(), 1);
        assert!(world
            .actor(ActorId(1))
            .unwrap()
            .casts
            .current(CastCategory::Channeled)
            .is_none());
    }

    #[test]
    fn aura_cancel_respects_attributes() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new()
            .spell(10, SpellAttributes::POSITIVE)
            .spell(11, SpellAttributes::POSITIVE | SpellAttributes::NO_AURA_CANCEL)
            .spell(12, SpellAttributes::empty());
        {
            let actor = world.actor_mut(ActorId(1)).unwrap();
            for spell in [10, 11, 12] {
                actor.auras.apply(AuraApplication {
                    spell: SpellId(spell),
                    behavior: AuraBehavior::Generic,
                    caster: None,
                    flags: AuraFlags::POSITIVE,
                });
            }
        }

        // cancel-restricted
        assert_eq!(
            process(
                &mut world,
                &registry,
                session,
                Request::CancelAura { spell: SpellId(11), caster: None },
            )
            .unwrap_err(),
            Rejection::Ignored
        );

        // negative spell: not removable by the player
        assert_eq!(
            process(
                &mut world,
                &registry,
                session,
                Request::CancelAura { spell: SpellId(12), caster: None },
            )
            .unwrap_err(),
            Rejection::Ignored
        );

        // plain positive aura goes away
        let directives = process(
            &mut world,
            &registry,
            session,
            Request::CancelAura { spell: SpellId(10), caster: None },
        )
        .unwrap();
        assert_eq!(
            directives,
            vec![Directive::AuraRemoved {
                actor: ActorId(1),
                spell: SpellId(10)
            }]
        );
    }

    #[test]
    fn mount_category_cancel_leaves_protected_auras() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new();
        {
            let actor = world.actor_mut(ActorId(1)).unwrap();
            actor.auras.apply(AuraApplication {
                spell: SpellId(1),
                behavior: AuraBehavior::Mounted,
                caster: None,
                flags: AuraFlags::POSITIVE,
            });
            actor.auras.apply(AuraApplication {
                spell: SpellId(2),
                behavior: AuraBehavior::Mounted,
                caster: None,
                flags: AuraFlags::POSITIVE | AuraFlags::NO_CANCEL,
            });
            actor.auras.apply(AuraApplication {
                spell: SpellId(3),
                behavior: AuraBehavior::ModScale,
                caster: None,
                flags: AuraFlags::POSITIVE,
            });
        }

        let directives =
            process(&mut world, &registry, session, Request::CancelMountAuras).unwrap();
        assert_eq!(
            directives,
            vec![Directive::AuraRemoved {
                actor: ActorId(1),
                spell: SpellId(1)
            }]
        );
        // the protected mount and the scale aura survive
        assert_eq!(world.actor(ActorId(1)).unwrap().auras.iter().count(), 2);
    }

    #[test]
    fn uncontrolled_speed_cancel_validates_claimed_mover() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new();

        let err = process(
            &mut world,
            &registry,
            session,
            Request::CancelUncontrolledSpeedAuras { mover: ActorId(9) },
        )
        .unwrap_err();
        assert_eq!(err, Rejection::Stale);
    }

    // ------------------------------------------------------------------
    // summons and self-resurrection
    // ------------------------------------------------------------------

    fn world_with_totem(slot: usize) -> (WorldState, SessionContext) {
        let (mut world, session) = player_world();
        world.add_actor(ActorState::new(
            ActorId(7),
            ActorKind::Totem,
            crate::state::Position::ORIGIN,
        ));
        world.actor_mut(ActorId(1)).unwrap().summon_slots[slot] = Some(ActorId(7));
        (world, session)
    }

    #[test]
    fn destroy_summon_out_of_range_slot_is_noop() {
        let (mut world, session) = world_with_totem(0);
        let registry = FixtureRegistry::new();

        let directives = process(
            &mut world,
            &registry,
            session,
            Request::DestroySummon {
                slot: WorldConfig::MAX_TOTEM_SLOTS as u8,
                summon: ActorId(7),
            },
        )
        .unwrap();
        assert!(directives.is_empty());
        assert!(world.actor(ActorId(7)).is_some());
    }

    #[test]
    fn destroy_summon_requires_identity_match() {
        let (mut world, session) = world_with_totem(0);
        let registry = FixtureRegistry::new();

        let directives = process(
            &mut world,
            &registry,
            session,
            Request::DestroySummon { slot: 0, summon: ActorId(99) },
        )
        .unwrap();
        assert!(directives.is_empty());

        let directives = process(
            &mut world,
            &registry,
            session,
            Request::DestroySummon { slot: 0, summon: ActorId(7) },
        )
        .unwrap();
        assert_eq!(directives, vec![Directive::Unsummoned { summon: ActorId(7) }]);
        assert!(world.actor(ActorId(7)).is_none());
        assert!(world.actor(ActorId(1)).unwrap().summon_slots[0].is_none());
    }

    #[test]
    fn self_resurrect_is_silently_blocked_by_prevention() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new()
            .spell(10, SpellAttributes::POSITIVE)
            .spell(11, SpellAttributes::POSITIVE | SpellAttributes::BYPASS_RESURRECTION_PREVENTION);
        {
            let actor = world.actor_mut(ActorId(1)).unwrap();
            actor.self_res_spells.push(SpellId(10));
            actor.self_res_spells.push(SpellId(11));
            actor.auras.apply(AuraApplication {
                spell: SpellId(50),
                behavior: AuraBehavior::PreventResurrection,
                caster: None,
                flags: AuraFlags::empty(),
            });
        }

        // blocked: no cast, and the grant is kept
        let directives = process(
            &mut world,
            &registry,
            session,
            Request::SelfResurrect { spell: SpellId(10) },
        )
        .unwrap();
        assert!(directives.is_empty());
        assert!(world
            .actor(ActorId(1))
            .unwrap()
            .self_res_spells
            .contains(&SpellId(10)));

        // bypass attribute works through the prevention and consumes the grant
        let directives = process(
            &mut world,
            &registry,
            session,
            Request::SelfResurrect { spell: SpellId(11) },
        )
        .unwrap();
        assert!(directives
            .iter()
            .any(|d| matches!(d, Directive::BeginCast { .. })));
        assert!(!world
            .actor(ActorId(1))
            .unwrap()
            .self_res_spells
            .contains(&SpellId(11)));
    }

    #[test]
    fn self_resurrect_requires_granted_spell() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().spell(10, SpellAttributes::POSITIVE);

        assert_eq!(
            process(
                &mut world,
                &registry,
                session,
                Request::SelfResurrect { spell: SpellId(10) },
            )
            .unwrap_err(),
            Rejection::Ignored
        );
    }

    // ------------------------------------------------------------------
    // queries and missiles
    // ------------------------------------------------------------------

    #[test]
    fn mirror_image_serves_player_and_creature_variants() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().item({
            let mut t = ItemTemplate::new(300, ItemClass::Armor);
            t.display_id = 777;
            t
        });

        // creator player with one visible equipped item
        let mut creator =
            ActorState::new(ActorId(2), ActorKind::Player, crate::state::Position::ORIGIN);
        creator.appearance.display_id = 123;
        creator.appearance.customizations = vec![1, 2, 3];
        creator
            .inventory
            .insert(SlotRef::equipment(4), ItemInstance::new(ItemGuid(9), 300));
        world.add_actor(creator);

        // the mirror unit carries a clone-caster aura pointing at the creator
        let mut mirror =
            ActorState::new(ActorId(3), ActorKind::Creature, crate::state::Position::ORIGIN);
        mirror.auras.apply(AuraApplication {
            spell: SpellId(60),
            behavior: AuraBehavior::CloneCaster,
            caster: Some(ActorId(2)),
            flags: AuraFlags::empty(),
        });
        world.add_actor(mirror);

        let directives = process(
            &mut world,
            &registry,
            session,
            Request::QueryMirrorImage { target: ActorId(3) },
        )
        .unwrap();
        let Some(Directive::MirrorImage(MirrorImageData::Humanoid {
            display_id,
            item_display_ids,
            customizations,
            ..
        })) = directives.first()
        else {
            panic!("expected humanoid mirror data");
        };
        assert_eq!(*display_id, 123);
        assert_eq!(item_display_ids[4], 777);
        assert_eq!(customizations, &vec![1, 2, 3]);

        // creature creator: plain display id variant
        let mut beast =
            ActorState::new(ActorId(4), ActorKind::Creature, crate::state::Position::ORIGIN);
        beast.appearance.display_id = 456;
        world.add_actor(beast);
        let mut mirror2 =
            ActorState::new(ActorId(5), ActorKind::Creature, crate::state::Position::ORIGIN);
        mirror2.auras.apply(AuraApplication {
            spell: SpellId(60),
            behavior: AuraBehavior::CloneCaster,
            caster: Some(ActorId(4)),
            flags: AuraFlags::empty(),
        });
        world.add_actor(mirror2);

        let directives = process(
            &mut world,
            &registry,
            session,
            Request::QueryMirrorImage { target: ActorId(5) },
        )
        .unwrap();
        assert!(matches!(
            directives.first(),
            Some(Directive::MirrorImage(MirrorImageData::Creature {
                display_id: 456,
                ..
            }))
        ));
    }

    #[test]
    fn mirror_image_without_clone_aura_is_dropped() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new();
        world.add_actor(ActorState::new(
            ActorId(2),
            ActorKind::Creature,
            crate::state::Position::ORIGIN,
        ));

        assert_eq!(
            process(
                &mut world,
                &registry,
                session,
                Request::QueryMirrorImage { target: ActorId(2) },
            )
            .unwrap_err(),
            Rejection::Ignored
        );
    }

    #[test]
    fn missile_collision_relocates_destination_and_broadcasts() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().spell(10, SpellAttributes::empty());
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .known_spells
            .insert(SpellId(10));

        let request = Request::CastSpell(CastRequest {
            spell: SpellId(10),
            targets: TargetDescriptor {
                dst: Some(Position::new(10.0, 0.0, 0.0)),
                ..TargetDescriptor::default()
            },
            client_cast_id: 1,
            move_stop: None,
        });
        process(&mut world, &registry, session, request).unwrap();
        let cast_id = world
            .actor(ActorId(1))
            .unwrap()
            .casts
            .current(CastCategory::Generic)
            .unwrap()
            .cast_id;

        let collision = Position::new(6.0, 1.0, 0.0);
        let directives = process(
            &mut world,
            &registry,
            session,
            Request::MissileCollision {
                caster: ActorId(1),
                spell: SpellId(10),
                cast_id,
                position: collision,
            },
        )
        .unwrap();
        assert_eq!(
            directives,
            vec![Directive::MissileCollisionBroadcast {
                caster: ActorId(1),
                cast_id,
                position: collision,
            }]
        );
        assert_eq!(
            world
                .actor(ActorId(1))
                .unwrap()
                .casts
                .current(CastCategory::Generic)
                .unwrap()
                .targets
                .dst,
            Some(collision)
        );
    }

    #[test]
    fn missile_trajectory_requires_cast_identity_and_endpoints() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().spell(10, SpellAttributes::empty());
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .known_spells
            .insert(SpellId(10));

        // a cast without src cannot accept trajectory updates
        let request = Request::CastSpell(CastRequest {
            spell: SpellId(10),
            targets: TargetDescriptor {
                dst: Some(Position::new(10.0, 0.0, 0.0)),
                ..TargetDescriptor::default()
            },
            client_cast_id: 1,
            move_stop: None,
        });
        process(&mut world, &registry, session, request).unwrap();
        let cast_id = world
            .actor(ActorId(1))
            .unwrap()
            .casts
            .current(CastCategory::Generic)
            .unwrap()
            .cast_id;

        let update = Request::MissileTrajectory {
            caster: ActorId(1),
            spell: SpellId(10),
            cast_id,
            src: Position::new(0.0, 0.0, 1.0),
            dst: Position::new(9.0, 0.0, 1.0),
            pitch: 0.5,
            speed: 24.0,
            move_stop: None,
        };
        assert_eq!(
            process(&mut world, &registry, session, update.clone()).unwrap_err(),
            Rejection::Ignored
        );

        // give the cast a source, then the update applies
        world
            .actor_mut(ActorId(1))
            .unwrap()
            .casts
            .current_mut(CastCategory::Generic)
            .unwrap()
            .targets
            .src = Some(Position::ORIGIN);
        process(&mut world, &registry, session, update).unwrap();

        let targets = &world
            .actor(ActorId(1))
            .unwrap()
            .casts
            .current(CastCategory::Generic)
            .unwrap()
            .targets;
        assert_eq!(targets.src, Some(Position::new(0.0, 0.0, 1.0)));
        assert_eq!(targets.dst, Some(Position::new(9.0, 0.0, 1.0)));
        assert_eq!(targets.pitch, 0.5);
        assert_eq!(targets.speed, 24.0);
    }

    // ------------------------------------------------------------------
    // keybound overrides and pets
    // ------------------------------------------------------------------

    #[test]
    fn keybound_override_requires_matching_aura() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new()
            .spell(10, SpellAttributes::empty())
            .keybound(4, 10);

        assert_eq!(
            process(
                &mut world,
                &registry,
                session,
                Request::KeyboundOverride { override_id: 4 },
            )
            .unwrap_err(),
            Rejection::Ignored
        );

        world
            .actor_mut(ActorId(1))
            .unwrap()
            .auras
            .apply(AuraApplication {
                spell: SpellId(70),
                behavior: AuraBehavior::KeyboundOverride(4),
                caster: None,
                flags: AuraFlags::empty(),
            });
        let directives = process(
            &mut world,
            &registry,
            session,
            Request::KeyboundOverride { override_id: 4 },
        )
        .unwrap();
        assert!(directives
            .iter()
            .any(|d| matches!(d, Directive::BeginCast { spell, .. } if *spell == SpellId(10))));
    }

    #[test]
    fn pet_cancel_aura_checks_ownership_and_liveness() {
        let (mut world, session) = player_world();
        let registry = FixtureRegistry::new().spell(10, SpellAttributes::POSITIVE);

        // not owned
        let mut stranger =
            ActorState::new(ActorId(2), ActorKind::Pet, crate::state::Position::ORIGIN);
        stranger.owner = Some(ActorId(42));
        world.add_actor(stranger);
        assert!(matches!(
            process(
                &mut world,
                &registry,
                session,
                Request::PetCancelAura { pet: ActorId(2), spell: SpellId(10) },
            )
            .unwrap_err(),
            Rejection::Protocol(ProtocolViolation::NotOwnedPet { .. })
        ));

        // owned but dead
        let mut pet = ActorState::new(ActorId(3), ActorKind::Pet, crate::state::Position::ORIGIN)
            .with_owner(ActorId(1));
        pet.alive = false;
        world.add_actor(pet);
        let directives = process(
            &mut world,
            &registry,
            session,
            Request::PetCancelAura { pet: ActorId(3), spell: SpellId(10) },
        )
        .unwrap();
        assert_eq!(
            directives,
            vec![Directive::PetFeedback {
                pet: ActorId(3),
                feedback: PetFeedback::Dead
            }]
        );

        // owned and alive: the aura is removed
        let mut pet = ActorState::new(ActorId(4), ActorKind::Pet, crate::state::Position::ORIGIN)
            .with_owner(ActorId(1));
        pet.auras.apply(AuraApplication {
            spell: SpellId(10),
            behavior: AuraBehavior::Generic,
            caster: None,
            flags: AuraFlags::POSITIVE,
        });
        world.add_actor(pet);
        let directives = process(
            &mut world,
            &registry,
            session,
            Request::PetCancelAura { pet: ActorId(4), spell: SpellId(10) },
        )
        .unwrap();
        assert_eq!(
            directives,
            vec![Directive::AuraRemoved { actor: ActorId(4), spell: SpellId(10) }]
        );
    }
}
