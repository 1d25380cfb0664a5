//! Per-action-kind precondition checks.
//!
//! Everything here is a pure validation over current authoritative state;
//! side effects (binding flips, aura removal, cast registration) stay in the
//! dispatcher. Each function early-returns the first failing check with a
//! structured [`Rejection`].

use super::error::{EquipError, IntegrityError, ProtocolViolation, Rejection};
use crate::env::{
    InventoryKind, ItemClass, ItemTemplate, ItemTemplateFlags, SpellAttributes, SpellDefinition,
    WorldEnv,
};
use crate::state::{ActorState, ItemGuid, SlotRef, SpellTargets, TriggerMode, WorldState};

/// Successful outcome of the use-item checks.
#[derive(Clone, Debug)]
pub struct ItemUseEligibility {
    pub template: ItemTemplate,
    /// The item's binding policy triggers on use and the instance is not yet
    /// bound; the dispatcher flips it before the cast begins.
    pub needs_bind: bool,
}

/// Validates a use-item request against the actor's current inventory.
pub fn check_item_use(
    actor: &ActorState,
    env: &WorldEnv<'_>,
    slot: SlotRef,
    claimed: ItemGuid,
) -> Result<ItemUseEligibility, Rejection> {
    let item = actor
        .inventory
        .item_at(slot)
        .ok_or(EquipError::ItemNotFound)?;

    // claimed identity must match the instance actually at the slot
    if item.guid != claimed {
        return Err(EquipError::ItemNotFound.into());
    }

    let template = env
        .items()?
        .template(item.entry)
        .ok_or(Rejection::Rule(EquipError::ItemNotFound))?;

    // some item classes can be used only in equipped state
    if template.inventory_kind == InventoryKind::Equip && !slot.is_equipment() {
        return Err(EquipError::ItemNotFound.into());
    }

    // delegated capability check (cooldowns, class/race/level/skill)
    env.items()?.can_use(actor, &template)?;

    // only exempt consumables may be used in a ranked match
    if template.class == ItemClass::Consumable
        && !template
            .flags
            .contains(ItemTemplateFlags::IGNORE_ARENA_RESTRICTIONS)
        && actor.in_arena
    {
        return Err(EquipError::NotDuringRankedMatch.into());
    }

    if template
        .flags
        .contains(ItemTemplateFlags::NOT_USABLE_IN_ARENA)
        && actor.in_arena
    {
        return Err(EquipError::NotDuringRankedMatch.into());
    }

    if actor.in_combat {
        for &spell in &template.effects {
            if let Some(def) = env.spells()?.definition(spell, actor.difficulty)
                && !def.usable_in_combat()
            {
                return Err(EquipError::NotInCombat.into());
            }
        }
    }

    let needs_bind = template.bonding.binds_on_use() && !item.bound;

    Ok(ItemUseEligibility {
        template,
        needs_bind,
    })
}

/// How a validated container open proceeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpenPath {
    /// Wrapped gift: requires the deferred gift-record lookup.
    Wrapped,
    /// Ordinary lootable container.
    Container,
}

/// Validates an open-item request.
pub fn check_open(
    actor: &ActorState,
    env: &WorldEnv<'_>,
    slot: SlotRef,
) -> Result<(ItemGuid, OpenPath), Rejection> {
    // the client outputs its own message for this, but re-check server-side
    if !actor.alive {
        return Err(EquipError::PlayerDead.into());
    }

    let item = actor
        .inventory
        .item_at(slot)
        .ok_or(EquipError::ItemNotFound)?;

    let template = env
        .items()?
        .template(item.entry)
        .ok_or(Rejection::Rule(EquipError::ItemNotFound))?;

    // must be an actual lootable container or a wrapped gift; anything else
    // is a forged request
    if !template.flags.contains(ItemTemplateFlags::HAS_LOOT) && !item.wrapped {
        return Err(ProtocolViolation::NotOpenable {
            item: item.guid,
            entry: item.entry,
        }
        .into());
    }

    if let Some(lock_id) = template.lock_id {
        // a lock id that resolves to nothing is corrupt registry data, not
        // a locked item
        if env.locks()?.lookup(lock_id).is_none() {
            return Err(IntegrityError::UnknownLock {
                item: item.guid,
                lock_id,
            }
            .into());
        }

        // was not unlocked yet
        if item.locked {
            return Err(EquipError::AlreadyLocked.into());
        }
    }

    let path = if item.wrapped {
        OpenPath::Wrapped
    } else {
        OpenPath::Container
    };
    Ok((item.guid, path))
}

/// Known-spell gate for a cast request. Returns the trigger mode the cast
/// will carry.
///
/// A player caster must know the spell, or qualify for one of the explicit
/// exemptions: raid markers, a lock-bearing object target whose unlock spell
/// matches, or a grant through a client-trigger aura (which marks the cast
/// system-triggered). Non-player casters were already validated by vehicle
/// redirection.
pub fn check_cast_permission(
    world: &WorldState,
    caster: &ActorState,
    def: &SpellDefinition,
    targets: &SpellTargets,
) -> Result<TriggerMode, Rejection> {
    if !caster.is_player() {
        return Ok(TriggerMode::Normal);
    }

    if caster.knows_spell(def.id) || def.attributes.contains(SpellAttributes::RAID_MARKER) {
        return Ok(TriggerMode::Normal);
    }

    // unknown spells are castable on special lock-bearing targets
    if let Some(object) = targets.object
        && let Some(object) = world.object(object)
        && object.unlock_spell == Some(def.id)
    {
        return Ok(TriggerMode::Normal);
    }

    if caster.auras.grants_client_trigger(def.id) {
        return Ok(TriggerMode::System);
    }

    Err(Rejection::Ignored)
}

/// Path a single-aura cancel takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuraCancelPath {
    /// The spell is channeled: cancel by interrupting the channeled cast
    /// slot, never by removing the aura.
    Channeled,
    /// Remove the owned aura application.
    Removal,
}

/// Validates a single-aura cancel against the spell definition.
pub fn check_aura_cancel(def: &SpellDefinition) -> Result<AuraCancelPath, Rejection> {
    if !def.player_cancelable_aura() {
        return Err(Rejection::Ignored);
    }

    if def.is_channeled() {
        return Ok(AuraCancelPath::Channeled);
    }

    // players cannot self-remove harmful or passive effects this way
    if !def.is_positive() || def.is_passive() {
        return Err(Rejection::Ignored);
    }

    Ok(AuraCancelPath::Removal)
}
