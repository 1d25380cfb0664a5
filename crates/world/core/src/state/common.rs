//! Identity and coordinate primitives shared across the state model.

/// Unique identity of a live actor (player, creature, pet, vehicle, totem).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ActorId(pub u64);

/// Unique identity of a world object (chest, door, lever, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ObjectId(pub u64);

/// Persistent identity of an item instance.
///
/// Unlike slot references, the guid survives moves between slots and is the
/// key for all item-scoped persistence (gift records, stored loot).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemGuid(pub u64);

/// Identifier of a spell definition. Scoped by [`Difficulty`] at lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SpellId(pub u32);

/// Server-assigned identity of an active cast.
///
/// Distinct from the opaque client correlation id; the two are paired in the
/// cast-prepare acknowledgment so the client can correlate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CastId(pub u64);

/// World-space position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub const ORIGIN: Position = Position {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Squared distance to another position. Callers compare against squared
    /// ranges to avoid the sqrt.
    pub fn distance_sq(self, other: Position) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    pub fn within(self, other: Position, range: f32) -> bool {
        self.distance_sq(other) <= range * range
    }
}

/// Map difficulty tier. Spell definitions are scoped by `(SpellId, Difficulty)`;
/// oracle implementations fall back to [`Difficulty::Normal`] when no scoped
/// record exists.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Difficulty {
    #[default]
    Normal,
    Heroic,
    Mythic,
}
