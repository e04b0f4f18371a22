//! # peerrank Testkit
//!
//! Testing utilities for peerrank.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known inputs with their expected identifier encodings
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Named identifiers and peer identities for scenario tests
//!
//! ## Golden Vectors
//!
//! ```rust
//! use peerrank_testkit::vectors::all_vectors;
//!
//! for vector in all_vectors() {
//!     let id = vector.compute().unwrap();
//!     assert_eq!(id.to_string(), vector.expected_b58);
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use peerrank_testkit::generators::LookupParams;
//!
//! proptest! {
//!     #[test]
//!     fn closest_first(params: LookupParams) {
//!         let ranked = params.ranked();
//!         prop_assert_eq!(ranked.len(), params.peers.len());
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use peerrank_testkit::fixtures::{scenario, PeerFixture};
//!
//! let [h1, .., h5] = scenario();
//! assert_eq!(h1, h5);
//!
//! let peer = PeerFixture::with_seed([7; 32]);
//! assert_eq!(peer.id.len(), 34);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{peer_identifier, scenario, sort_set, swarm, PeerFixture};
pub use generators::{identifier, LookupParams};
pub use vectors::{all_vectors, verify_all_vectors, GoldenVector};
