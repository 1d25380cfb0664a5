//! Active-cast state.
//!
//! An actor holds at most one active cast per [`CastCategory`]. The pipeline
//! always re-fetches the current cast by category from the actor instead of
//! trusting a client-supplied handle, because the active cast can change or
//! end between request send and processing.

use super::super::common::{ActorId, CastId, ObjectId, Position, SpellId};

/// Cast category. Each category has an independent slot on the actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastCategory {
    /// Ordinary casts with a cast time or instant execution.
    Generic,
    /// Channeled spells, sustained until finished or interrupted.
    Channeled,
    /// Auto-repeating ranged spells.
    AutoRepeat,
}

/// How a cast was triggered.
///
/// System-triggered casts (granted through a client-trigger aura) suppress
/// normal cost/GCD semantics. The flag is threaded through to the execution
/// engine opaquely; this core does not re-derive its effects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerMode {
    #[default]
    Normal,
    System,
}

/// Concrete target set resolved from client-supplied descriptors.
///
/// Built once by the resolver and consumed by later stages as a first-class
/// value; never re-derived from raw request input.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellTargets {
    pub unit: Option<ActorId>,
    pub object: Option<ObjectId>,
    pub src: Option<Position>,
    pub dst: Option<Position>,
    pub pitch: f32,
    pub speed: f32,
}

impl SpellTargets {
    pub fn self_only() -> Self {
        Self::default()
    }

    pub fn has_dst(&self) -> bool {
        self.dst.is_some()
    }

    pub fn has_src(&self) -> bool {
        self.src.is_some()
    }
}

/// A cast currently in progress.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveCast {
    pub cast_id: CastId,
    pub spell: SpellId,
    pub category: CastCategory,
    pub targets: SpellTargets,
    pub trigger: TriggerMode,
}

/// Per-category cast slots for a single actor.
///
/// Enforces the invariant that an actor has at most one active cast per
/// category at any instant.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastSet {
    generic: Option<ActiveCast>,
    channeled: Option<ActiveCast>,
    auto_repeat: Option<ActiveCast>,
}

impl CastSet {
    fn slot(&self, category: CastCategory) -> &Option<ActiveCast> {
        match category {
            CastCategory::Generic => &self.generic,
            CastCategory::Channeled => &self.channeled,
            CastCategory::AutoRepeat => &self.auto_repeat,
        }
    }

    fn slot_mut(&mut self, category: CastCategory) -> &mut Option<ActiveCast> {
        match category {
            CastCategory::Generic => &mut self.generic,
            CastCategory::Channeled => &mut self.channeled,
            CastCategory::AutoRepeat => &mut self.auto_repeat,
        }
    }

    /// Current cast in the given category, if any.
    pub fn current(&self, category: CastCategory) -> Option<&ActiveCast> {
        self.slot(category).as_ref()
    }

    pub fn current_mut(&mut self, category: CastCategory) -> Option<&mut ActiveCast> {
        self.slot_mut(category).as_mut()
    }

    /// Registers a new cast in its category slot, returning the cast it
    /// displaced (which the dispatcher reports as interrupted).
    pub fn begin(&mut self, cast: ActiveCast) -> Option<ActiveCast> {
        self.slot_mut(cast.category).replace(cast)
    }

    /// Removes and returns the current cast in the category.
    pub fn interrupt(&mut self, category: CastCategory) -> Option<ActiveCast> {
        self.slot_mut(category).take()
    }

    /// Finds any active cast with the given spell id, regardless of category.
    pub fn find_by_spell(&self, spell: SpellId) -> Option<&ActiveCast> {
        [&self.generic, &self.channeled, &self.auto_repeat]
            .into_iter()
            .find_map(|slot| slot.as_ref().filter(|cast| cast.spell == spell))
    }

    pub fn find_by_spell_mut(&mut self, spell: SpellId) -> Option<&mut ActiveCast> {
        [
            &mut self.generic,
            &mut self.channeled,
            &mut self.auto_repeat,
        ]
        .into_iter()
        .find_map(|slot| slot.as_mut().filter(|cast| cast.spell == spell))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cast(id: u64, spell: u32, category: CastCategory) -> ActiveCast {
        ActiveCast {
            cast_id: CastId(id),
            spell: SpellId(spell),
            category,
            targets: SpellTargets::self_only(),
            trigger: TriggerMode::Normal,
        }
    }

    #[test]
    fn begin_displaces_only_same_category() {
        let mut casts = CastSet::default();
        assert!(casts.begin(cast(1, 10, CastCategory::Generic)).is_none());
        assert!(casts.begin(cast(2, 11, CastCategory::Channeled)).is_none());

        let displaced = casts.begin(cast(3, 12, CastCategory::Generic)).unwrap();
        assert_eq!(displaced.cast_id, CastId(1));
        assert_eq!(
            casts.current(CastCategory::Channeled).unwrap().spell,
            SpellId(11)
        );
    }

    #[test]
    fn interrupt_clears_slot() {
        let mut casts = CastSet::default();
        casts.begin(cast(1, 10, CastCategory::AutoRepeat));
        assert!(casts.interrupt(CastCategory::AutoRepeat).is_some());
        assert!(casts.current(CastCategory::AutoRepeat).is_none());
        assert!(casts.interrupt(CastCategory::AutoRepeat).is_none());
    }

    #[test]
    fn find_by_spell_searches_all_categories() {
        let mut casts = CastSet::default();
        casts.begin(cast(1, 10, CastCategory::Channeled));
        assert_eq!(casts.find_by_spell(SpellId(10)).unwrap().cast_id, CastId(1));
        assert!(casts.find_by_spell(SpellId(99)).is_none());
    }
}
