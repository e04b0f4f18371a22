//! Error types for peerrank.

use peerrank_core::CoreError;
use peerrank_queue::QueueError;
use thiserror::Error;

/// Errors that can occur while ranking peers.
#[derive(Debug, Error)]
pub enum PeerRankError {
    /// Identifier or metric error.
    #[error("core error: {0}")]
    Core(#[from] CoreError),

    /// Queue error.
    #[error("queue error: {0}")]
    Queue(#[from] QueueError),
}

/// Result type for peerrank operations.
pub type Result<T> = std::result::Result<T, PeerRankError>;
