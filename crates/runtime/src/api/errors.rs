//! Runtime error types.

use tokio::sync::oneshot;

use crate::repository::StorageError;

/// Result type for runtime operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors surfaced by the runtime façade and worker.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("command channel closed")]
    CommandChannelClosed,

    #[error("reply channel closed")]
    ReplyChannelClosed(#[from] oneshot::error::RecvError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Oracle(#[from] world_core::OracleError),
}
