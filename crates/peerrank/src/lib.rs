//! # peerrank
//!
//! Rank peers and content by closeness under the XOR metric.
//!
//! ## Overview
//!
//! peerrank is the ordering core of a Kademlia-style lookup:
//!
//! - **Identifiers**: self-describing digests shared by peers and content
//! - **Metric**: XOR distance, bucket indices, stable sorting by closeness
//! - **Queues**: a min-heap of peers around a fixed center, and a channel
//!   adapter that serves it to concurrent producers and consumers
//!
//! ## Usage
//!
//! ```rust,no_run
//! use peerrank::{CancellationToken, Identifier, PeerRanker, RankerConfig};
//!
//! async fn example(peers: Vec<Identifier>) -> peerrank::Result<()> {
//!     let ranker = PeerRanker::new(RankerConfig::default());
//!     let target = Identifier::from_peer_key(b"target public key");
//!
//!     // Synchronous ranking
//!     let closest = ranker.nearest(&target, &peers)?;
//!     println!("{} candidates", closest.len());
//!
//!     // Concurrent lookup
//!     let lookup = ranker.spawn_lookup(target, CancellationToken::new());
//!     for peer in peers {
//!         lookup.enqueue(peer).await?;
//!     }
//!     if let Some(next) = lookup.dequeue().await {
//!         println!("query {next} first");
//!     }
//!     lookup.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `peerrank::core` - Identifiers, digests, frames, and the metric
//! - `peerrank::queue` - DistanceQueue and the channel adapter

pub mod error;
pub mod ranker;

// Re-export component crates
pub use peerrank_core as core;
pub use peerrank_queue as queue;

// Re-export main types for convenience
pub use error::{PeerRankError, Result};
pub use ranker::{PeerRanker, RankerConfig};

// Re-export commonly used component types
pub use peerrank_core::{Distance, HashCode, HashSpec, Identifier, FRAME_LEN};
pub use peerrank_queue::{
    CancellationToken, ChanQueue, ChanQueueConfig, Dequeuer, DispatchReport, DistanceQueue,
    Enqueuer, PeerEntry,
};
