//! Bounded Priority Queue Component
//!
//! A fixed-capacity work queue shared by any number of producer and consumer
//! threads. Producers block while it is full, consumers block while it is
//! empty, and a shared [`CancellationToken`](crate::core::shutdown::CancellationToken)
//! releases every blocked thread at shutdown.
//!
//! # Ordering
//!
//! - **Priority first**: `remove` returns the item with the highest priority
//!   key currently held, wherever it sits in the buffer
//! - **FIFO tie-break**: among equal keys the earliest arrival leaves first,
//!   end to end, even after out-of-order removals
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐ ┌────────────┐            ┌────────────┐ ┌────────────┐
//! │ Producer 1 │ │ Producer 2 │            │ Consumer 1 │ │ Consumer 2 │
//! └─────┬──────┘ └─────┬──────┘            └─────▲──────┘ └─────▲──────┘
//!       │ insert       │ insert                  │ remove       │ remove
//!       ▼              ▼                         │              │
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ PriorityQueue           Mutex<PriorityRing> + not_full / not_empty  │
//! │   ┌───┬───┬───┬───┬───┬───┐                                         │
//! │   │ 5 │ 0 │ 9 │ 5 │   │   │   head ─▶ arrival order ─▶ tail         │
//! │   └───┴───┴───┴───┴───┴───┘   remove takes 9, then 5, 5, 0          │
//! └─────────────────────────────────────────────────────────────────────┘
//!                      ▲
//!                      │ signal(): lock, set flag, broadcast both
//!               CancellationToken
//! ```
//!
//! # Lifecycle
//!
//! The queue is **active** until the token is observed set; from then on it is
//! **draining**, a terminal state in which `insert` and `remove` fail fast with
//! [`QueueError::Cancelled`] instead of blocking.
//!
//! # Example Usage
//!
//! ```rust
//! use prioqueue::core::shutdown::CancellationToken;
//! use prioqueue::queue::{Item, Priority, PriorityQueue};
//! use std::sync::Arc;
//! use std::thread;
//!
//! let token = CancellationToken::new();
//! let queue = Arc::new(PriorityQueue::<Item>::new(2, token.clone()).unwrap());
//!
//! let consumer = {
//!     let queue = Arc::clone(&queue);
//!     thread::spawn(move || {
//!         let mut seen = Vec::new();
//!         while let Ok(dequeued) = queue.remove() {
//!             seen.push(dequeued.item.value());
//!         }
//!         seen
//!     })
//! };
//!
//! queue.insert(Item::new(3, Priority::LOW, 1, 1)).unwrap();
//! queue.insert(Item::new(8, Priority::HIGH, 1, 2)).unwrap();
//! while !queue.is_empty() {
//!     thread::yield_now();
//! }
//! token.signal();
//!
//! assert_eq!(consumer.join().unwrap().len(), 2);
//! ```

mod bounded;
mod error;
mod item;
mod ring;

pub use bounded::{Dequeued, PriorityQueue, WaitOutcome, DEFAULT_MAX_CAPACITY};
pub use error::{QueueError, QueueResult, Rejected};
pub use item::{Item, Prioritized, Priority};

#[cfg(test)]
mod tests;
