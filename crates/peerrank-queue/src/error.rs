//! Error types for the queue module.

use thiserror::Error;

use peerrank_core::CoreError;

/// Errors that can occur while feeding a queue.
#[derive(Debug, Error)]
pub enum QueueError {
    /// The identifier could not be measured against the queue's center.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// The adapter was cancelled or its dispatcher has stopped.
    #[error("peer queue closed")]
    Closed,
}

/// Result type for queue operations.
pub type Result<T> = std::result::Result<T, QueueError>;
