//! Compile-time limits and tuning constants for the world server core.

/// Fixed limits used for bounded collections and validation.
///
/// These are compile-time constants so state types can size their
/// `ArrayVec` storage without heap allocation.
pub struct WorldConfig;

impl WorldConfig {
    /// Maximum number of aura applications an actor can carry.
    pub const MAX_AURAS: usize = 32;

    /// Maximum number of summon (totem) slots per actor.
    ///
    /// A destroy-summon request naming a slot at or beyond this limit is a
    /// no-op.
    pub const MAX_TOTEM_SLOTS: usize = 4;

    /// Maximum number of granted self-resurrection spells.
    pub const MAX_SELF_RES_SPELLS: usize = 4;

    /// Number of equipment slots whose item display ids are visible to other
    /// clients (mirror-image queries).
    pub const VISIBLE_EQUIPMENT_SLOTS: usize = 11;

    /// Maximum distance at which an actor may interact with a world object.
    ///
    /// Line-of-sight is delegated to the map collaborator; this core only
    /// enforces range.
    pub const INTERACT_RANGE: f32 = 5.0;

    /// Maximum distance at which entity-directory lookups resolve.
    pub const VISIBILITY_RANGE: f32 = 100.0;
}
