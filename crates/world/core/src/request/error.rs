//! Rejection taxonomy for the request pipeline.
//!
//! Validation never panics or unwinds; every check is a local early return
//! carrying one of these values. The runtime decides what each class means
//! operationally: rule failures become client error codes, protocol
//! violations are logged as suspected exploitation and dropped, staleness is
//! silent, integrity errors trigger defensive cleanup.

use crate::env::OracleError;
use crate::state::{ActorId, ItemGuid, SpellId};

/// Structured error codes surfaced to the client for expected rule failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipError {
    ItemNotFound,
    NotInCombat,
    NotDuringRankedMatch,
    LockedOut,
    AlreadyLocked,
    PlayerDead,
}

/// Malformed or logically impossible requests; a well-behaved client never
/// sends these. Logged as suspected exploitation, then dropped.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolViolation {
    #[error("unknown spell id {spell:?}")]
    UnknownSpell { spell: SpellId },

    #[error("unknown pet spell id {spell:?}")]
    UnknownPetSpell { spell: SpellId },

    #[error("unknown keybound override id {override_id}")]
    UnknownOverride { override_id: u32 },

    #[error("item {item:?} (entry {entry}) is not openable")]
    NotOpenable { item: ItemGuid, entry: u32 },

    #[error("unit {pet:?} is not a pet of the requester")]
    NotOwnedPet { pet: ActorId },
}

/// A referenced persisted or registry record is missing. Treated as corrupt
/// state: cleaned up defensively and logged at error severity.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    #[error("item {item:?} references unknown lock id {lock_id}")]
    UnknownLock { item: ItemGuid, lock_id: u32 },

    #[error("wrapped item {item:?} has no backing gift record")]
    MissingGiftRecord { item: ItemGuid },
}

/// Why a request did not proceed.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum Rejection {
    /// Expected rule failure; surfaced to the client, never logged.
    #[error("rule failure: {0:?}")]
    Rule(EquipError),

    /// Suspected exploitation; logged, silently dropped.
    #[error(transparent)]
    Protocol(#[from] ProtocolViolation),

    /// Corrupt referenced state; cleanup plus error log.
    #[error(transparent)]
    Integrity(#[from] IntegrityError),

    /// World state changed between send and processing. An expected race,
    /// never logged, never reported.
    #[error("request is stale")]
    Stale,

    /// Well-formed but disallowed right now; dropped without response. The
    /// client suppresses these itself under normal operation.
    #[error("request ignored")]
    Ignored,

    /// Server-side configuration fault (missing oracle).
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl From<EquipError> for Rejection {
    fn from(code: EquipError) -> Self {
        Rejection::Rule(code)
    }
}
