//! The PeerRanker: ranking, bucketing, and lookup queues in one place.
//!
//! The ranker holds no peers itself. It applies one configuration to the
//! primitives in `peerrank-core` and `peerrank-queue` so callers do not thread
//! bucket sizes and buffer sizes through every call site.

use peerrank_core::{common_prefix_len, nearest, sort_by_distance, Identifier};
use peerrank_queue::{ChanQueue, ChanQueueConfig, DistanceQueue};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::Result;

/// Configuration for the PeerRanker.
#[derive(Debug, Clone)]
pub struct RankerConfig {
    /// How many peers [`PeerRanker::nearest`] returns (Kademlia `k`).
    pub bucket_size: usize,
    /// Number of routing buckets. Prefix lengths past the last bucket share it.
    pub bucket_count: usize,
    /// Channel adapter configuration for lookups.
    pub queue: ChanQueueConfig,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            bucket_size: 20,
            bucket_count: 256,
            queue: ChanQueueConfig::default(),
        }
    }
}

/// Ranks peers by XOR distance under one configuration.
#[derive(Debug, Clone, Default)]
pub struct PeerRanker {
    config: RankerConfig,
}

impl PeerRanker {
    /// Create a ranker.
    pub fn new(config: RankerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Ranking
    // ─────────────────────────────────────────────────────────────────────────

    /// All `peers`, closest to `center` first. Equal distances keep input order.
    pub fn rank(&self, center: &Identifier, peers: &[Identifier]) -> Result<Vec<Identifier>> {
        Ok(sort_by_distance(center, peers)?)
    }

    /// The `bucket_size` peers closest to `center`.
    pub fn nearest(&self, center: &Identifier, peers: &[Identifier]) -> Result<Vec<Identifier>> {
        Ok(nearest(center, peers, self.config.bucket_size)?)
    }

    /// Routing bucket of `peer` as seen from `local`.
    ///
    /// This is the number of leading bits the two share, clamped to the last
    /// bucket. A peer equal to `local` lands in the last bucket.
    pub fn bucket_index(&self, local: &Identifier, peer: &Identifier) -> Result<usize> {
        let prefix = common_prefix_len(local, peer)?;
        Ok(prefix.min(self.config.bucket_count.saturating_sub(1)))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lookups
    // ─────────────────────────────────────────────────────────────────────────

    /// An empty single-owner queue around `center`.
    pub fn queue(&self, center: Identifier) -> DistanceQueue {
        DistanceQueue::new(center)
    }

    /// Spawn a channel adapter around `center` for a concurrent lookup.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_lookup(&self, center: Identifier, cancel: CancellationToken) -> ChanQueue {
        debug!(center = %center, "starting lookup queue");
        ChanQueue::with_config(cancel, DistanceQueue::new(center), self.config.queue.clone())
    }
}
