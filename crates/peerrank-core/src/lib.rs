//! # peerrank Core
//!
//! Pure primitives for ranking peers by closeness: identifiers, digests, the
//! fixed-width identifier frame, and the XOR metric.
//!
//! This crate contains no I/O beyond reading and writing frames, no tasks, and
//! no networking. Everything here is a value type or a pure function.
//!
//! ## Key Types
//!
//! - [`Identifier`] - Self-describing digest (multihash) or the null sentinel
//! - [`HashSpec`] / [`HashCode`] - Which algorithm and length built a digest
//! - [`Distance`] - Arbitrary-precision XOR distance between two identifiers
//!
//! ## Metric
//!
//! Identifiers double as content addresses and peer addresses, so the same
//! [`metric::distance`] answers both "which peer holds this key" and "which
//! peer is closest to that peer". See the [`metric`] module.

pub mod digest;
pub mod error;
pub mod frame;
pub mod identifier;
pub mod metric;

pub use digest::{HashCode, HashSpec};
pub use error::{CoreError, Result};
pub use frame::FRAME_LEN;
pub use identifier::Identifier;
pub use metric::{
    common_prefix_len, distance, lexicographic_less, nearest, sort_by_distance, xor,
    zero_prefix_len, Distance,
};
