//! Lock definitions and the lock registry oracle.

/// Immutable lock record referenced by items and world objects.
///
/// A lock id that does not resolve to a definition is a data-integrity
/// error, distinct from "still locked".
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LockDefinition {
    pub id: u32,
    /// Item entry of the key that opens this lock, if key-openable.
    pub key_item: Option<u32>,
    /// Minimum lockpicking skill, if pickable.
    pub pick_skill: Option<u32>,
}

/// Read-only lock registry.
pub trait LockOracle: Send + Sync {
    fn lookup(&self, id: u32) -> Option<LockDefinition>;
}
