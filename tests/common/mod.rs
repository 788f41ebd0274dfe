//! Shared helpers for integration tests

use prioqueue::core::shutdown::CancellationToken;
use prioqueue::queue::{Item, Priority, PriorityQueue};
use std::sync::Arc;

/// Item from producer 1 whose sequence doubles as its identity
pub fn item(sequence: u64, priority: u8) -> Item {
    Item::new(0, Priority(priority), 1, sequence)
}

pub fn shared_queue(capacity: usize) -> (Arc<PriorityQueue<Item>>, CancellationToken) {
    let token = CancellationToken::new();
    let queue = PriorityQueue::new(capacity, token.clone()).unwrap();
    (Arc::new(queue), token)
}
