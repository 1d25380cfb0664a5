//! Deferred reconciliation for wrapped-item opens.
//!
//! Opening a gift requires an out-of-band lookup of the item's true
//! identity. The continuation captures `(slot, guid)` at issue time and
//! runs later on the owning worker's sequential stream, strictly after
//! other mutations may have occurred, so it re-validates that triple
//! against current state before touching anything. A mismatch is an
//! expected race and aborts silently; only a missing backing record is a
//! fault, answered by defensive cleanup.

use tracing::error;

use world_core::{IntegrityError, ItemGuid, SessionContext, SlotRef, WorldState};

use crate::oracles::OracleSet;
use crate::repository::{CharacterStore, GiftRecord, StorageError};

/// Continuation for one in-flight wrapped-item open.
///
/// Holds the minimal data needed to re-validate that the referenced item is
/// still the same instance in the same logical state. There is no explicit
/// cancel: the continuation no-ops when its captured identity no longer
/// matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingWrappedOpen {
    pub session: SessionContext,
    /// Slot the item occupied when the lookup was issued.
    pub slot: SlotRef,
    /// Item identity when the lookup was issued.
    pub item: ItemGuid,
}

/// Applies a completed gift lookup against current world state.
pub async fn complete(
    world: &mut WorldState,
    oracles: &OracleSet,
    characters: &dyn CharacterStore,
    pending: PendingWrappedOpen,
    outcome: Result<Option<GiftRecord>, StorageError>,
) {
    let player = pending.session.player;

    let record = match outcome {
        Ok(record) => record,
        Err(e) => {
            error!(
                target: "world::storage",
                item = pending.item.0,
                error = %e,
                "gift lookup failed"
            );
            return;
        }
    };

    // Re-validate the captured triple against current state. The world may
    // have changed underneath the lookup; divergence is a stale request,
    // not a fault.
    let Some(actor) = world.actor(player) else {
        return;
    };
    let Some(item) = actor.inventory.item_at(pending.slot) else {
        return;
    };
    if item.guid != pending.item || !item.wrapped {
        return;
    }

    // No backing record at all: the item is corrupt. Remove it rather than
    // leave a gift that can never open.
    let Some(record) = record else {
        let violation = IntegrityError::MissingGiftRecord { item: pending.item };
        error!(
            target: "world::storage",
            %violation,
            "corrupt wrapped item will be deleted"
        );
        if let Some(actor) = world.actor_mut(player) {
            actor.inventory.remove(pending.slot);
        }
        return;
    };

    let max_durability = oracles
        .as_env()
        .items()
        .ok()
        .and_then(|items| items.template(record.entry))
        .map(|template| template.max_durability)
        .unwrap_or(0);

    // Rewrite the item's identity from the record.
    let Some(actor) = world.actor_mut(player) else {
        return;
    };
    let Some(item) = actor.inventory.item_at_mut(pending.slot) else {
        return;
    };
    item.entry = record.entry;
    item.wrapped = false;
    item.gift_creator = None;
    item.bound = record.bound;
    item.max_durability = max_durability;
    item.durability = max_durability;

    // Persist the inventory and consume the gift record in one transaction.
    let inventory = actor.inventory.clone();
    if let Err(e) = characters
        .commit_unwrap(player, &inventory, pending.item)
        .await
    {
        error!(
            target: "world::storage",
            item = pending.item.0,
            error = %e,
            "failed to persist unwrap transaction"
        );
    }
}
