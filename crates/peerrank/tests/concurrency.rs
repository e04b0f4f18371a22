//! Concurrent lookups through the channel adapter.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use peerrank::core::distance;
use peerrank::{CancellationToken, Identifier, PeerRanker, RankerConfig};
use peerrank_testkit::fixtures::{random_identifiers, swarm};
use peerrank_testkit::generators::LookupParams;
use proptest::prelude::*;
use tokio::time::timeout;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Workers pull the closest known peer, "query" it, and feed back the peers
/// it knows. Peer `i` knows peers `i+1..=i+5`, so every peer is reachable
/// from the seeds.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_iterative_lookup_reaches_every_peer() {
    init_tracing();
    const NETWORK: usize = 200;
    const FANOUT: usize = 5;

    let ranker = PeerRanker::default();
    let network: Vec<Identifier> = swarm(NETWORK).into_iter().map(|p| p.id).collect();
    let index: Arc<HashMap<Identifier, usize>> = Arc::new(
        network
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect(),
    );
    let target = Identifier::from_peer_key(b"lookup target");

    let lookup = ranker.spawn_lookup(target.clone(), CancellationToken::new());
    for seed in &network[..10] {
        lookup.enqueue(seed.clone()).await.unwrap();
    }

    let queried = Arc::new(Mutex::new(HashSet::new()));
    let mut workers = Vec::new();

    for _ in 0..4 {
        let enq = lookup.enqueuer();
        let deq = lookup.dequeuer();
        let network = network.clone();
        let index = Arc::clone(&index);
        let queried = Arc::clone(&queried);

        workers.push(tokio::spawn(async move {
            while let Some(peer) = deq.dequeue().await {
                if !queried.lock().unwrap().insert(peer.clone()) {
                    continue;
                }
                let i = index[&peer];
                for step in 1..=FANOUT {
                    let known = network[(i + step) % network.len()].clone();
                    if enq.enqueue(known).await.is_err() {
                        return;
                    }
                }
            }
        }));
    }

    timeout(Duration::from_secs(10), async {
        while queried.lock().unwrap().len() < NETWORK {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("every peer queried");

    let report = lookup.shutdown().await;
    for worker in workers {
        timeout(Duration::from_secs(2), worker).await.unwrap().unwrap();
    }

    let best = &ranker.nearest(&target, &network).unwrap()[0];
    assert!(queried.lock().unwrap().contains(best));
    assert!(report.accepted >= 10 + NETWORK);
    assert!(report.delivered <= report.accepted);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_accepted_peer_is_delivered_once() {
    init_tracing();
    let ranker = PeerRanker::new(RankerConfig {
        queue: peerrank::ChanQueueConfig {
            enqueue_buffer: 4,
            dequeue_buffer: 2,
        },
        ..Default::default()
    });
    let center = Identifier::from_peer_key(b"center");
    let lookup = ranker.spawn_lookup(center, CancellationToken::new());

    let batches: Vec<Vec<Identifier>> = (0..8).map(|_| random_identifiers(100)).collect();
    let total: usize = batches.iter().map(Vec::len).sum();

    let producers: Vec<_> = batches
        .clone()
        .into_iter()
        .map(|batch| {
            let enq = lookup.enqueuer();
            tokio::spawn(async move {
                for id in batch {
                    enq.enqueue(id).await.unwrap();
                }
            })
        })
        .collect();

    let consumers: Vec<_> = (0..5)
        .map(|_| {
            let deq = lookup.dequeuer();
            tokio::spawn(async move {
                let mut got = Vec::new();
                while let Some(id) = deq.dequeue().await {
                    got.push(id);
                }
                got
            })
        })
        .collect();

    for producer in producers {
        producer.await.unwrap();
    }

    // Producers are done; the dispatcher stops once the heap drains and every
    // handle is gone, which ends the consumers too.
    let report = timeout(Duration::from_secs(10), lookup.join()).await.unwrap();

    let mut delivered = Vec::new();
    for consumer in consumers {
        delivered.extend(consumer.await.unwrap());
    }

    assert_eq!(report.accepted, total);
    assert_eq!(report.delivered, total);
    assert_eq!(report.discarded, 0);

    let mut expected: Vec<_> = batches.into_iter().flatten().collect();
    expected.sort();
    delivered.sort();
    assert_eq!(delivered, expected);
}

#[tokio::test]
async fn test_cancel_stops_blocked_producers() {
    let ranker = PeerRanker::new(RankerConfig {
        queue: peerrank::ChanQueueConfig {
            enqueue_buffer: 1,
            dequeue_buffer: 1,
        },
        ..Default::default()
    });
    let cancel = CancellationToken::new();
    let lookup = ranker.spawn_lookup(Identifier::from_peer_key(b"center"), cancel.clone());

    let producers: Vec<_> = (0..8)
        .map(|_| {
            let enq = lookup.enqueuer();
            tokio::spawn(async move {
                for id in random_identifiers(1000) {
                    if enq.enqueue(id).await.is_err() {
                        return;
                    }
                }
            })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(10)).await;
    cancel.cancel();

    for producer in producers {
        timeout(Duration::from_secs(2), producer).await.unwrap().unwrap();
    }
    assert_eq!(lookup.dequeue().await, None);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_lookup_drains_closest_first(params: LookupParams) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let drained = rt.block_on(async {
            let lookup = PeerRanker::default()
                .spawn_lookup(params.center.clone(), CancellationToken::new());
            for peer in &params.peers {
                lookup.enqueue(peer.clone()).await.unwrap();
            }
            let mut out = Vec::new();
            for _ in 0..params.peers.len() {
                out.push(lookup.dequeue().await.unwrap());
            }
            lookup.shutdown().await;
            out
        });

        prop_assert_eq!(drained.len(), params.peers.len());
        for pair in drained.windows(2) {
            let a = distance(&pair[0], &params.center).unwrap();
            let b = distance(&pair[1], &params.center).unwrap();
            prop_assert!(a <= b);
        }
        prop_assert_eq!(drained, params.ranked());
    }
}
