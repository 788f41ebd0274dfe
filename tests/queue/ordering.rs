//! Ordering guarantees seen through the public API

use crate::common::{item, shared_queue};
use prioqueue::queue::{Prioritized, Priority};

fn drain_sequences(queue: &prioqueue::queue::PriorityQueue<prioqueue::queue::Item>) -> Vec<u64> {
    (0..queue.size())
        .map(|_| queue.remove().unwrap().item.sequence())
        .collect()
}

#[test]
fn test_priority_dominates_arrival() {
    let (queue, _token) = shared_queue(3);
    queue.insert(item(1, 2)).unwrap();
    queue.insert(item(2, 2)).unwrap();
    queue.insert(item(3, 5)).unwrap();

    let first = queue.remove().unwrap().item;
    assert_eq!(first.priority(), Priority(5));
    assert_eq!(first.sequence(), 3);
}

#[test]
fn test_fifo_tie_break() {
    // A(3), B(3), C(5) leave as C, A, B
    let (queue, _token) = shared_queue(3);
    queue.insert(item(1, 3)).unwrap();
    queue.insert(item(2, 3)).unwrap();
    queue.insert(item(3, 5)).unwrap();

    assert_eq!(drain_sequences(&queue), vec![3, 1, 2]);
}

#[test]
fn test_bands_interleaved_over_many_wraps() {
    let (queue, _token) = shared_queue(4);
    let mut next = 1u64;
    let mut removed = Vec::new();

    // Keep the ring partly full so head and tail wrap repeatedly
    for round in 0..50u64 {
        while !queue.is_full() {
            queue.insert(item(next, ((next + round) % 3) as u8)).unwrap();
            next += 1;
        }
        for _ in 0..2 {
            let it = queue.remove().unwrap().item;
            removed.push((it.priority(), it.sequence()));
        }
    }

    // Within each priority, sequences leave in increasing order
    for band in 0..3u8 {
        let sequences: Vec<u64> = removed
            .iter()
            .filter(|(p, _)| *p == Priority(band))
            .map(|(_, s)| *s)
            .collect();
        assert!(
            sequences.windows(2).all(|w| w[0] < w[1]),
            "band {} out of order: {:?}",
            band,
            sequences
        );
    }
}

#[test]
fn test_capacity_is_fixed() {
    let (queue, _token) = shared_queue(2);

    assert_eq!(queue.capacity(), 2);
    queue.insert(item(1, 0)).unwrap();
    queue.insert(item(2, 0)).unwrap();
    assert!(queue.is_full());
    assert_eq!(queue.size(), 2);
}
