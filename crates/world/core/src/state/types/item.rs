//! Item instances, inventory slots, and generated loot payloads.

use std::collections::BTreeMap;

use super::super::common::{ActorId, ItemGuid};

/// Reference to one inventory slot: a bag index plus a slot index.
///
/// The equipment bag is a reserved index; an item is "equipped" exactly when
/// it sits in that bag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlotRef {
    pub bag: u8,
    pub slot: u8,
}

impl SlotRef {
    /// Reserved bag index holding equipped items.
    pub const EQUIPMENT_BAG: u8 = 255;

    pub fn new(bag: u8, slot: u8) -> Self {
        Self { bag, slot }
    }

    pub fn equipment(slot: u8) -> Self {
        Self {
            bag: Self::EQUIPMENT_BAG,
            slot,
        }
    }

    pub fn is_equipment(self) -> bool {
        self.bag == Self::EQUIPMENT_BAG
    }
}

/// One entry of a generated loot payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootEntry {
    pub item_entry: u32,
    pub count: u16,
    pub taken: bool,
}

/// Loot generated for a container item.
///
/// Generated at most once per item instance; persisted only while it still
/// holds unclaimed value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LootPayload {
    pub money: u64,
    pub entries: Vec<LootEntry>,
}

impl LootPayload {
    pub fn is_empty(&self) -> bool {
        self.money == 0 && self.entries.is_empty()
    }

    /// True while the payload still contains money or un-taken entries and is
    /// therefore worth persisting.
    pub fn unclaimed(&self) -> bool {
        self.money > 0 || self.entries.iter().any(|e| !e.taken)
    }
}

/// A concrete item owned by exactly one inventory slot.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInstance {
    pub guid: ItemGuid,
    /// Template entry; rewritten when a wrapped gift is opened.
    pub entry: u32,
    pub bound: bool,
    pub wrapped: bool,
    /// Set while wrapped; cleared when the gift is opened.
    pub gift_creator: Option<ActorId>,
    /// True while a lock-protected item has not been unlocked.
    pub locked: bool,
    pub durability: u32,
    pub max_durability: u32,
    /// Loot generated on first open, if any.
    pub loot: Option<LootPayload>,
}

impl ItemInstance {
    pub fn new(guid: ItemGuid, entry: u32) -> Self {
        Self {
            guid,
            entry,
            bound: false,
            wrapped: false,
            gift_creator: None,
            locked: false,
            durability: 0,
            max_durability: 0,
            loot: None,
        }
    }

    pub fn wrapped(mut self, creator: ActorId) -> Self {
        self.wrapped = true;
        self.gift_creator = Some(creator);
        self
    }

    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }
}

/// Slot-addressed item storage plus carried money for one actor.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Inventory {
    slots: BTreeMap<SlotRef, ItemInstance>,
    pub money: u64,
}

impl Inventory {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn item_at(&self, slot: SlotRef) -> Option<&ItemInstance> {
        self.slots.get(&slot)
    }

    pub fn item_at_mut(&mut self, slot: SlotRef) -> Option<&mut ItemInstance> {
        self.slots.get_mut(&slot)
    }

    /// Places an item into a slot, replacing whatever was there.
    pub fn insert(&mut self, slot: SlotRef, item: ItemInstance) -> Option<ItemInstance> {
        self.slots.insert(slot, item)
    }

    pub fn remove(&mut self, slot: SlotRef) -> Option<ItemInstance> {
        self.slots.remove(&slot)
    }

    /// Finds the slot currently holding the item with the given guid.
    pub fn slot_of(&self, guid: ItemGuid) -> Option<SlotRef> {
        self.slots
            .iter()
            .find_map(|(slot, item)| (item.guid == guid).then_some(*slot))
    }

    /// Items in the equipment bag, keyed by equipment slot index.
    pub fn equipped(&self) -> impl Iterator<Item = (u8, &ItemInstance)> {
        self.slots
            .range(SlotRef::equipment(0)..=SlotRef::equipment(u8::MAX))
            .map(|(slot, item)| (slot.slot, item))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SlotRef, &ItemInstance)> {
        self.slots.iter()
    }
}
