//! # peerrank Queue
//!
//! Priority queues of peers ordered by XOR distance to a fixed center.
//!
//! ## Overview
//!
//! - [`DistanceQueue`] is a single-owner min-heap. It is the building block
//!   and has no synchronization of its own.
//! - [`ChanQueue`] moves a `DistanceQueue` into a dispatcher task and exposes
//!   it to any number of producers ([`Enqueuer`]) and consumers
//!   ([`Dequeuer`]). A [`CancellationToken`] stops it.
//!
//! ## Key Properties
//!
//! - **Ordered**: each delivery is the closest identifier queued at that moment
//! - **FIFO ties**: equal distances come out in insertion order
//! - **Conserving**: until cancellation, every accepted identifier is delivered
//!   exactly once
//! - **Prompt cancellation**: blocked producers and consumers return once the
//!   token fires
//!
//! ## Usage
//!
//! ```rust,no_run
//! use peerrank_core::Identifier;
//! use peerrank_queue::{CancellationToken, ChanQueue, DistanceQueue};
//!
//! async fn example(center: Identifier, peers: Vec<Identifier>) {
//!     let cancel = CancellationToken::new();
//!     let queue = ChanQueue::spawn(cancel.clone(), DistanceQueue::new(center));
//!
//!     for peer in peers {
//!         queue.enqueue(peer).await.unwrap();
//!     }
//!
//!     while let Some(closest) = queue.dequeue().await {
//!         println!("next: {closest}");
//!         # break;
//!     }
//!
//!     let report = queue.shutdown().await;
//!     println!("{} left undelivered", report.discarded);
//! }
//! ```

pub mod chan_queue;
pub mod distance_queue;
pub mod error;

pub use chan_queue::{ChanQueue, ChanQueueConfig, Dequeuer, DispatchReport, Enqueuer};
pub use distance_queue::{DistanceQueue, PeerEntry};
pub use error::{QueueError, Result};

pub use tokio_util::sync::CancellationToken;
