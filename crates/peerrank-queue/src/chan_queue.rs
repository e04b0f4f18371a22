//! Channel adapter around a [`DistanceQueue`].
//!
//! A [`ChanQueue`] spawns one dispatcher task that owns the queue for its
//! whole life. Producers and consumers never touch the heap; they talk to the
//! dispatcher through channels:
//!
//! ```text
//!  Enqueuer ──(id, ack)──────┐
//!  Enqueuer ──(id, ack)──────┤                 ┌──── entry ──▶ Dequeuer
//!                            ▼                 │
//!                       ┌────────────┐  waiter │
//!                       │ dispatcher │◀────────┴──── waiter ── Dequeuer
//!                       │   (heap)   │◀─── handoff outcome
//!                       └────────────┘
//!                             ▲
//!                       CancellationToken
//! ```
//!
//! Each loop iteration the dispatcher waits on every event that can make
//! progress: an enqueue request, a waiting consumer, the outcome of the
//! current handoff, or cancellation. Branches are polled in random order so a
//! steady stream of one kind cannot starve the other.
//!
//! ## Handoff
//!
//! One entry is in flight at a time. The dispatcher pops the minimum into a
//! waiting consumer's reply slot and serves nobody else until that consumer
//! either takes the entry or gives up. A consumer that gives up (its dequeue
//! future is dropped, e.g. by a timeout) hands the entry back, and the entry
//! goes to the next waiter ahead of anything farther away. Enqueues are still
//! accepted while a handoff is pending.
//!
//! A dequeue future that has been handed an entry should be polled to
//! completion or dropped; holding it unpolled stalls other consumers.
//!
//! Cancellation discards whatever is still queued. Callers that need every
//! item must drain before cancelling.

use tokio::sync::oneshot::error::RecvError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use peerrank_core::{CoreError, Identifier};

use crate::distance_queue::{DistanceQueue, PeerEntry};
use crate::error::{QueueError, Result};

/// Configuration for a [`ChanQueue`].
#[derive(Debug, Clone)]
pub struct ChanQueueConfig {
    /// Enqueue requests buffered ahead of the dispatcher.
    pub enqueue_buffer: usize,
    /// Waiting consumers buffered ahead of the dispatcher.
    pub dequeue_buffer: usize,
}

impl Default for ChanQueueConfig {
    fn default() -> Self {
        Self {
            enqueue_buffer: 64,
            dequeue_buffer: 64,
        }
    }
}

/// What a dispatcher did before it stopped.
///
/// An entry whose handoff was still unresolved when the dispatcher stopped
/// counts as delivered; an entry handed back by then counts as discarded.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Identifiers inserted into the heap.
    pub accepted: usize,
    /// Entries taken by consumers.
    pub delivered: usize,
    /// Entries still queued when the dispatcher stopped.
    pub discarded: usize,
}

struct EnqueueRequest {
    id: Identifier,
    ack: oneshot::Sender<peerrank_core::Result<()>>,
}

/// A consumer waiting for an entry.
struct Waiter {
    reply: oneshot::Sender<PeerEntry>,
    /// Resolves with the entry if the consumer gives it back, or closes once
    /// the consumer has taken it.
    outcome: oneshot::Receiver<PeerEntry>,
}

/// Producer handle. Cheap to clone; every clone feeds the same queue.
#[derive(Clone)]
pub struct Enqueuer {
    requests: mpsc::Sender<EnqueueRequest>,
    center_len: usize,
    cancel: CancellationToken,
}

impl Enqueuer {
    /// Hand an identifier to the dispatcher.
    ///
    /// Resolves once the identifier is in the heap. Fails with
    /// `QueueError::Core` if it cannot be measured against the center, and
    /// with `QueueError::Closed` once the adapter is cancelled.
    pub async fn enqueue(&self, id: Identifier) -> Result<()> {
        if id.len() != self.center_len {
            return Err(CoreError::LengthMismatch {
                left: id.len(),
                right: self.center_len,
            }
            .into());
        }

        let (ack, accepted) = oneshot::channel();
        let request = EnqueueRequest { id, ack };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(QueueError::Closed),
            sent = self.requests.send(request) => sent.map_err(|_| QueueError::Closed)?,
        }

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(QueueError::Closed),
            outcome = accepted => {
                outcome.map_err(|_| QueueError::Closed)?.map_err(QueueError::from)
            }
        }
    }

    /// Check whether enqueues will be refused.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled() || self.requests.is_closed()
    }
}

/// Consumer handle. Cheap to clone; clones compete for the same entries.
#[derive(Clone)]
pub struct Dequeuer {
    waiters: mpsc::Sender<Waiter>,
    cancel: CancellationToken,
}

impl Dequeuer {
    /// Wait for the closest queued identifier.
    ///
    /// Returns `None` once the adapter is cancelled or can never deliver again.
    pub async fn dequeue(&self) -> Option<Identifier> {
        self.dequeue_entry().await.map(|entry| entry.id)
    }

    /// Like [`dequeue`](Self::dequeue), keeping the entry's distance.
    ///
    /// Dropping the returned future after the dispatcher picked an entry for
    /// it hands the entry back to the heap. An entry already handed over is
    /// returned even if cancellation fires at the same time.
    pub async fn dequeue_entry(&self) -> Option<PeerEntry> {
        let (reply_tx, reply) = oneshot::channel();
        let (give_back, outcome) = oneshot::channel();
        let mut pending = PendingReply {
            reply,
            give_back: Some(give_back),
        };
        let waiter = Waiter {
            reply: reply_tx,
            outcome,
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return None,
            sent = self.waiters.send(waiter) => sent.ok()?,
        }

        tokio::select! {
            biased;
            entry = &mut pending.reply => entry.ok(),
            _ = self.cancel.cancelled() => None,
        }
    }
}

/// Consumer side of one handoff. Dropping it settles the handoff: an entry
/// sitting unread in `reply` is given back, otherwise the dispatcher sees
/// `give_back` close.
struct PendingReply {
    reply: oneshot::Receiver<PeerEntry>,
    give_back: Option<oneshot::Sender<PeerEntry>>,
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.reply.close();
        if let Ok(entry) = self.reply.try_recv() {
            if let Some(give_back) = self.give_back.take() {
                let _ = give_back.send(entry);
            }
        }
    }
}

/// A concurrency-safe priority channel over one [`DistanceQueue`].
///
/// Each delivery is the closest identifier queued when it is handed over,
/// first-in first-out among equal distances.
pub struct ChanQueue {
    center: Identifier,
    enqueuer: Enqueuer,
    dequeuer: Dequeuer,
    cancel: CancellationToken,
    dispatcher: JoinHandle<DispatchReport>,
}

impl ChanQueue {
    /// Take ownership of `queue` and spawn its dispatcher with the default
    /// configuration.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(cancel: CancellationToken, queue: DistanceQueue) -> Self {
        Self::with_config(cancel, queue, ChanQueueConfig::default())
    }

    /// Take ownership of `queue` and spawn its dispatcher.
    ///
    /// Must be called from within a tokio runtime.
    pub fn with_config(
        cancel: CancellationToken,
        queue: DistanceQueue,
        config: ChanQueueConfig,
    ) -> Self {
        let (request_tx, request_rx) = mpsc::channel(config.enqueue_buffer.max(1));
        let (waiter_tx, waiter_rx) = mpsc::channel(config.dequeue_buffer.max(1));

        let center = queue.center().clone();
        let center_len = center.len();
        let dispatcher = Dispatcher {
            queue,
            requests: request_rx,
            waiters: waiter_rx,
            in_flight: None,
            cancel: cancel.clone(),
            report: DispatchReport::default(),
        };

        debug!(center = %center, "spawning peer queue dispatcher");
        let dispatcher = tokio::spawn(dispatcher.run());

        Self {
            center,
            enqueuer: Enqueuer {
                requests: request_tx,
                center_len,
                cancel: cancel.clone(),
            },
            dequeuer: Dequeuer {
                waiters: waiter_tx,
                cancel: cancel.clone(),
            },
            cancel,
            dispatcher,
        }
    }

    /// The identifier deliveries are ordered against.
    pub fn center(&self) -> &Identifier {
        &self.center
    }

    /// A producer handle.
    pub fn enqueuer(&self) -> Enqueuer {
        self.enqueuer.clone()
    }

    /// A consumer handle.
    pub fn dequeuer(&self) -> Dequeuer {
        self.dequeuer.clone()
    }

    /// Shorthand for `self.enqueuer().enqueue(id)`.
    pub async fn enqueue(&self, id: Identifier) -> Result<()> {
        self.enqueuer.enqueue(id).await
    }

    /// Shorthand for `self.dequeuer().dequeue()`.
    pub async fn dequeue(&self) -> Option<Identifier> {
        self.dequeuer.dequeue().await
    }

    /// Trigger cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Check whether cancellation has fired.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// The token this adapter stops on.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Drop this adapter's handles and wait for the dispatcher to stop.
    ///
    /// The dispatcher stops on cancellation, or on its own once no producer or
    /// consumer handle remains that could make further progress.
    pub async fn join(self) -> DispatchReport {
        let Self {
            enqueuer,
            dequeuer,
            dispatcher,
            ..
        } = self;
        drop(enqueuer);
        drop(dequeuer);

        match dispatcher.await {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "peer queue dispatcher failed");
                DispatchReport::default()
            }
        }
    }

    /// Cancel and wait for the dispatcher to stop.
    pub async fn shutdown(self) -> DispatchReport {
        self.cancel();
        self.join().await
    }
}

/// Sole owner of the heap.
struct Dispatcher {
    queue: DistanceQueue,
    requests: mpsc::Receiver<EnqueueRequest>,
    waiters: mpsc::Receiver<Waiter>,
    /// Outcome of the entry currently handed to a consumer.
    in_flight: Option<oneshot::Receiver<PeerEntry>>,
    cancel: CancellationToken,
    report: DispatchReport,
}

impl Dispatcher {
    async fn run(mut self) -> DispatchReport {
        let mut producers_open = true;

        loop {
            // Nothing queued, nothing in flight, and nobody left to queue more.
            if !producers_open && self.queue.is_empty() && self.in_flight.is_none() {
                break;
            }

            let can_serve = self.in_flight.is_none() && !self.queue.is_empty();
            let settling = self.in_flight.is_some();

            tokio::select! {
                _ = self.cancel.cancelled() => break,

                request = self.requests.recv(), if producers_open => match request {
                    Some(request) => self.accept(request),
                    None => producers_open = false,
                },

                waiter = self.waiters.recv(), if can_serve => match waiter {
                    Some(waiter) => self.offer(waiter),
                    // no consumer can ever receive again
                    None => break,
                },

                outcome = settle(&mut self.in_flight), if settling => {
                    self.in_flight = None;
                    self.settled(outcome);
                }
            }
        }

        if let Some(mut outcome) = self.in_flight.take() {
            match outcome.try_recv() {
                Ok(entry) => self.queue.restore(entry),
                // taken, or still unread by a consumer that will take it
                Err(_) => self.report.delivered += 1,
            }
        }

        self.report.discarded = self.queue.len();
        debug!(
            center = %self.queue.center(),
            accepted = self.report.accepted,
            delivered = self.report.delivered,
            discarded = self.report.discarded,
            cancelled = self.cancel.is_cancelled(),
            "peer queue dispatcher stopped"
        );
        self.report
    }

    fn accept(&mut self, request: EnqueueRequest) {
        let outcome = self.queue.enqueue(request.id);
        if outcome.is_ok() {
            self.report.accepted += 1;
        }
        // The producer may have stopped waiting; the id stays queued either way.
        let _ = request.ack.send(outcome);
    }

    fn offer(&mut self, waiter: Waiter) {
        if waiter.reply.is_closed() {
            return;
        }

        let Some(entry) = self.queue.dequeue_entry() else {
            return;
        };

        match waiter.reply.send(entry) {
            Ok(()) => self.in_flight = Some(waiter.outcome),
            Err(entry) => {
                trace!(id = %entry.id, "consumer left before delivery");
                self.queue.restore(entry);
            }
        }
    }

    fn settled(&mut self, outcome: std::result::Result<PeerEntry, RecvError>) {
        match outcome {
            Ok(entry) => {
                trace!(id = %entry.id, "consumer gave an entry back");
                self.queue.restore(entry);
            }
            Err(_) => self.report.delivered += 1,
        }
    }
}

/// Wait for the current handoff to resolve. Never resolves with nothing in
/// flight.
async fn settle(
    in_flight: &mut Option<oneshot::Receiver<PeerEntry>>,
) -> std::result::Result<PeerEntry, RecvError> {
    match in_flight {
        Some(outcome) => outcome.await,
        None => std::future::pending().await,
    }
}
