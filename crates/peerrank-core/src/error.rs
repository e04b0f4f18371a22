//! Error types for peerrank Core.

use thiserror::Error;

/// Errors produced while decoding, framing, or measuring identifiers.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid identifier encoding: {0}")]
    InvalidEncoding(String),

    #[error("malformed digest: {0}")]
    MalformedDigest(String),

    #[error("truncated frame: expected {expected} bytes, got {actual}")]
    TruncatedFrame { expected: usize, actual: usize },

    #[error("length mismatch: {left} bytes vs {right} bytes")]
    LengthMismatch { left: usize, right: usize },

    #[error("digest of {0} bytes does not fit the identifier frame")]
    UnframeableDigest(usize),

    #[error("unsupported hash algorithm: {0:#x}")]
    UnsupportedAlgorithm(u64),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
