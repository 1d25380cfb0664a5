//! Idempotent loot materialization for container opens.
//!
//! First open generates a payload; the payload is persisted only while it
//! holds unclaimed value, keyed by the item's instance guid. Subsequent
//! opens reuse the in-memory payload or reload the stored one; a second
//! open never regenerates or duplicates loot.

use world_core::{ActorId, ItemGuid, SlotRef, WorldEnv, WorldState};

use crate::api::Result;
use crate::events::{Ack, Event, EventBus};
use crate::repository::LootStore;

/// Materializes and delivers loot for a validated container open.
pub fn materialize(
    world: &mut WorldState,
    env: &WorldEnv<'_>,
    store: &dyn LootStore,
    bus: &EventBus,
    player: ActorId,
    slot: SlotRef,
    item_guid: ItemGuid,
) -> Result<()> {
    // Re-fetch from current state; validation ran in the same unsuspended
    // step, so this only guards against directive replay.
    let Some(actor) = world.actor_mut(player) else {
        return Ok(());
    };
    let Some(item) = actor.inventory.item_at_mut(slot) else {
        return Ok(());
    };
    if item.guid != item_guid {
        return Ok(());
    }

    if item.loot.is_none() {
        // stored loot first; only a true first open generates
        if let Some(stored) = store.load(item_guid)? {
            item.loot = Some(stored);
        } else {
            let Some(template) = env.items()?.template(item.entry) else {
                return Ok(());
            };
            let payload = world_core::loot::generate(env, item, &template)?;
            if payload.unclaimed() {
                store.save(item_guid, &payload)?;
            }
            item.loot = Some(payload);
        }
    }

    match &item.loot {
        Some(payload) if !payload.is_empty() => bus.publish(Event::Session {
            to: player,
            ack: Ack::Loot {
                item: item_guid,
                payload: payload.clone(),
            },
        }),
        _ => bus.publish(Event::Session {
            to: player,
            ack: Ack::NoLoot { item: item_guid },
        }),
    }

    Ok(())
}
