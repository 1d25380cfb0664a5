//! Item templates and the template registry oracle.

use crate::request::EquipError;
use crate::state::{ActorState, SpellId};

bitflags::bitflags! {
    /// Template-level item flags consulted by the eligibility gate.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ItemTemplateFlags: u32 {
        /// Item is a lootable container.
        const HAS_LOOT = 1 << 0;
        /// Consumable exempt from the ranked-match restriction.
        const IGNORE_ARENA_RESTRICTIONS = 1 << 1;
        /// Never usable in a ranked match, regardless of class.
        const NOT_USABLE_IN_ARENA = 1 << 2;
    }
}

/// Item class; the eligibility gate only distinguishes consumables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemClass {
    Consumable,
    Container,
    Weapon,
    Armor,
    Quest,
    Misc,
}

/// Inventory placement of an item type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InventoryKind {
    /// Usable from a bag; no equip requirement.
    #[default]
    NonEquip,
    /// Must be equipped before use.
    Equip,
}

/// Binding policy of an item template.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BondingPolicy {
    #[default]
    None,
    OnAcquire,
    OnUse,
    OnQuest,
}

impl BondingPolicy {
    /// True when using the item must flip an unbound instance to bound.
    pub fn binds_on_use(self) -> bool {
        matches!(
            self,
            BondingPolicy::OnUse | BondingPolicy::OnAcquire | BondingPolicy::OnQuest
        )
    }
}

/// Immutable item template.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemTemplate {
    pub entry: u32,
    pub class: ItemClass,
    pub inventory_kind: InventoryKind,
    pub flags: ItemTemplateFlags,
    pub bonding: BondingPolicy,
    pub lock_id: Option<u32>,
    /// Spells granted/cast when the item is used, in effect order.
    pub effects: Vec<SpellId>,
    pub display_id: u32,
    pub max_durability: u32,
    pub required_level: u32,
    /// Money loot range for containers, inclusive.
    pub money_loot: Option<(u64, u64)>,
}

impl ItemTemplate {
    pub fn new(entry: u32, class: ItemClass) -> Self {
        Self {
            entry,
            class,
            inventory_kind: InventoryKind::NonEquip,
            flags: ItemTemplateFlags::empty(),
            bonding: BondingPolicy::None,
            lock_id: None,
            effects: Vec::new(),
            display_id: 0,
            max_durability: 0,
            required_level: 0,
            money_loot: None,
        }
    }
}

/// Read-only item template registry plus the delegated usability check.
pub trait ItemTemplateOracle: Send + Sync {
    fn template(&self, entry: u32) -> Option<ItemTemplate>;

    /// General usability check for an actor and template: cooldowns,
    /// class/race/level/skill restrictions. The default implementation
    /// enforces only the level requirement; richer capability checks live in
    /// the registry implementation.
    fn can_use(&self, actor: &ActorState, template: &ItemTemplate) -> Result<(), EquipError> {
        if actor.level < template.required_level {
            return Err(EquipError::ItemNotFound);
        }
        Ok(())
    }
}
