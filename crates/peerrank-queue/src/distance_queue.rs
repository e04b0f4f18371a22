//! Single-center priority queue of peers.
//!
//! A [`DistanceQueue`] answers one question over its lifetime: which of the
//! identifiers handed to it is closest to its center. Distances are computed
//! once, at enqueue time.
//!
//! The queue is a plain value with `&mut self` mutators. It has no internal
//! synchronization; share it between tasks through
//! [`ChanQueue`](crate::ChanQueue).

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use peerrank_core::{distance, Distance, Identifier, Result};

/// An identifier with its precomputed distance to the queue center.
#[derive(Debug, Clone)]
pub struct PeerEntry {
    pub id: Identifier,
    pub distance: Distance,
    /// Insertion order, used to break distance ties.
    seq: u64,
}

impl PeerEntry {
    /// Position of this entry in the queue's insertion order.
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

impl PartialEq for PeerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PeerEntry {}

impl PartialOrd for PeerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PeerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .cmp(&other.distance)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Min-heap of identifiers keyed by XOR distance to a fixed center.
///
/// Ties are resolved first-in first-out. Duplicate identifiers are kept as
/// independent entries.
#[derive(Debug)]
pub struct DistanceQueue {
    center: Identifier,
    heap: BinaryHeap<Reverse<PeerEntry>>,
    next_seq: u64,
}

impl DistanceQueue {
    /// Create an empty queue around `center`.
    pub fn new(center: Identifier) -> Self {
        Self {
            center,
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// The identifier distances are measured against.
    pub fn center(&self) -> &Identifier {
        &self.center
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Insert an identifier.
    ///
    /// Fails with `LengthMismatch` if `id` cannot be measured against the center.
    pub fn enqueue(&mut self, id: Identifier) -> Result<()> {
        let distance = distance(&id, &self.center)?;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(PeerEntry { id, distance, seq }));
        Ok(())
    }

    /// Remove and return the closest identifier, `None` when empty.
    pub fn dequeue(&mut self) -> Option<Identifier> {
        self.dequeue_entry().map(|entry| entry.id)
    }

    /// Remove and return the closest entry with its distance.
    pub fn dequeue_entry(&mut self) -> Option<PeerEntry> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }

    /// The entry the next dequeue would return.
    pub fn peek(&self) -> Option<&PeerEntry> {
        self.heap.peek().map(|Reverse(entry)| entry)
    }

    /// Put back an entry that was dequeued but never delivered. It keeps its
    /// original place among equal-distance entries.
    pub(crate) fn restore(&mut self, entry: PeerEntry) {
        self.heap.push(Reverse(entry));
    }
}
