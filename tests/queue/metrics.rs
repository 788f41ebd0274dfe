//! Workers reporting to the metrics aggregator around queue calls

use crate::common::shared_queue;
use prioqueue::metrics::{Metrics, Utilisation};
use prioqueue::queue::{Item, Prioritized, Priority};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn test_counters_follow_queue_outcomes() {
    let (queue, token) = shared_queue(1);
    let metrics = Arc::new(Metrics::new());

    let producer = {
        let (queue, metrics) = (queue.clone(), metrics.clone());
        thread::spawn(move || {
            for sequence in 1..=20u64 {
                let value = (sequence % 10) as u32;
                let item = Item::new(value, Priority::for_value(value), 1, sequence);
                match queue.insert(item) {
                    Ok(outcome) => {
                        metrics.record_produced();
                        if outcome.waited() {
                            metrics.record_producer_blocked();
                        }
                    }
                    Err(_) => break,
                }
            }
        })
    };

    let consumer = {
        let (queue, metrics) = (queue.clone(), metrics.clone());
        thread::spawn(move || {
            while let Ok(dequeued) = queue.remove() {
                metrics.record_consumed(dequeued.item.priority(), dequeued.item.latency());
                if dequeued.outcome.waited() {
                    metrics.record_consumer_blocked();
                }
                thread::sleep(Duration::from_millis(1));
            }
        })
    };

    producer.join().unwrap();
    while !queue.is_empty() {
        thread::sleep(Duration::from_millis(1));
    }
    token.signal();
    consumer.join().unwrap();

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.produced, 20);
    assert_eq!(snapshot.consumed, 20);
    assert_eq!(snapshot.in_flight(), 0);
    assert_eq!(
        snapshot.consumed_with(Priority::HIGH)
            + snapshot.consumed_with(Priority::NORMAL)
            + snapshot.consumed_with(Priority::LOW),
        20
    );
    // A slow consumer on a single slot keeps the producer waiting
    assert!(snapshot.producer_blocks > 0);
    assert!(snapshot.min_latency <= snapshot.max_latency);
    assert_ne!(snapshot.utilisation(), Utilisation::FrequentlyEmpty);
}
