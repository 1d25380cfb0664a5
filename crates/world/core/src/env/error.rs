//! Oracle availability errors.

/// Returned when a required oracle was not provided to the [`super::Env`]
/// aggregate. This is a server configuration fault, not a client error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("spell oracle not available")]
    SpellsNotAvailable,

    #[error("item template oracle not available")]
    ItemsNotAvailable,

    #[error("lock oracle not available")]
    LocksNotAvailable,

    #[error("loot oracle not available")]
    LootNotAvailable,

    #[error("rng oracle not available")]
    RngNotAvailable,
}
