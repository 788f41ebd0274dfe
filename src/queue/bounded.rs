//! Blocking bounded priority queue
//!
//! A monitor around [`PriorityRing`]: one mutex guards the ring, one condition
//! variable parks producers while the ring is full and another parks consumers
//! while it is empty. Both waits re-check the [`CancellationToken`] on every
//! wake-up, and the token broadcasts both conditions under this mutex when it
//! is signalled, so no waiter can stay suspended past shutdown.

use super::error::{QueueError, QueueResult, Rejected};
use super::item::Prioritized;
use super::ring::PriorityRing;
use crate::core::shutdown::{CancellationToken, Interrupt};
use crate::core::sync::handle_mutex_poison;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Largest capacity accepted by [`PriorityQueue::new`]
pub const DEFAULT_MAX_CAPACITY: usize = 20;

/// Whether a blocking call had to suspend before it completed.
///
/// Computed inside the locked region, so it is exact rather than a racy
/// "was it full/empty just before I called" guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Immediate,
    Waited,
}

impl WaitOutcome {
    pub fn waited(self) -> bool {
        matches!(self, WaitOutcome::Waited)
    }
}

/// An item handed to a consumer by [`PriorityQueue::remove`].
#[derive(Debug)]
pub struct Dequeued<T> {
    pub item: T,
    pub outcome: WaitOutcome,
}

struct Shared<T> {
    ring: Mutex<PriorityRing<T>>,
    not_full: Condvar,
    not_empty: Condvar,
}

impl<T: Send> Interrupt for Shared<T> {
    fn interrupt(&self, flag: &AtomicBool) {
        // Wake-up must happen even if a worker panicked while holding the lock
        let _ring = self.ring.lock().unwrap_or_else(PoisonError::into_inner);
        flag.store(true, Ordering::Release);
        self.not_full.notify_all();
        self.not_empty.notify_all();
    }
}

/// Bounded, priority-ordered, multi-producer multi-consumer work queue.
///
/// `remove` always returns the item with the highest priority key; items with
/// equal keys leave in the order they arrived. Share it between threads with
/// `Arc<PriorityQueue<T>>`.
///
/// # Example
///
/// ```
/// use prioqueue::core::shutdown::CancellationToken;
/// use prioqueue::queue::{Item, Priority, PriorityQueue};
///
/// let token = CancellationToken::new();
/// let queue = PriorityQueue::new(4, token.clone()).unwrap();
///
/// queue.insert(Item::new(1, Priority::LOW, 1, 1)).unwrap();
/// queue.insert(Item::new(9, Priority::HIGH, 1, 2)).unwrap();
///
/// assert_eq!(queue.remove().unwrap().item.value(), 9);
///
/// token.signal();
/// assert!(queue.remove().unwrap_err().is_cancelled());
/// ```
pub struct PriorityQueue<T> {
    shared: Arc<Shared<T>>,
    token: CancellationToken,
}

impl<T: Prioritized + Send + 'static> PriorityQueue<T> {
    /// Create a queue holding at most `capacity` items, bounded by
    /// [`DEFAULT_MAX_CAPACITY`].
    pub fn new(capacity: usize, token: CancellationToken) -> QueueResult<Self> {
        Self::with_max_capacity(capacity, DEFAULT_MAX_CAPACITY, token)
    }

    /// Create a queue, accepting any capacity from 1 to `max_capacity`.
    pub fn with_max_capacity(
        capacity: usize,
        max_capacity: usize,
        token: CancellationToken,
    ) -> QueueResult<Self> {
        if capacity == 0 || capacity > max_capacity {
            return Err(QueueError::InvalidCapacity {
                capacity,
                max: max_capacity,
            });
        }

        let shared = Arc::new(Shared {
            ring: Mutex::new(PriorityRing::new(capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
        });
        let listener: Arc<dyn Interrupt> = shared.clone();
        // The token only holds a weak handle; dropped queues are pruned
        token.register(Arc::downgrade(&listener));

        Ok(Self { shared, token })
    }
}

impl<T: Prioritized> PriorityQueue<T> {
    fn lock(&self) -> QueueResult<MutexGuard<'_, PriorityRing<T>>> {
        handle_mutex_poison(self.shared.ring.lock(), |message| {
            QueueError::Synchronisation { message }
        })
    }

    /// Add `item` at the tail, blocking while the queue is full.
    ///
    /// Fails with [`QueueError::Cancelled`] if shutdown is signalled before or
    /// while waiting; the item is returned inside the error.
    pub fn insert(&self, item: T) -> Result<WaitOutcome, Rejected<T>> {
        let mut ring = match self.lock() {
            Ok(ring) => ring,
            Err(reason) => return Err(Rejected::new(item, reason)),
        };

        let mut outcome = WaitOutcome::Immediate;
        while ring.is_full() && !self.token.is_cancelled() {
            outcome = WaitOutcome::Waited;
            ring = match handle_mutex_poison(self.shared.not_full.wait(ring), |message| {
                QueueError::Synchronisation { message }
            }) {
                Ok(ring) => ring,
                Err(reason) => return Err(Rejected::new(item, reason)),
            };
        }

        if self.token.is_cancelled() {
            return Err(Rejected::new(item, QueueError::Cancelled));
        }

        if let Err(item) = ring.push_back(item) {
            return Err(Rejected::new(
                item,
                QueueError::Synchronisation {
                    message: "queue full after wait completed".to_string(),
                },
            ));
        }
        self.shared.not_empty.notify_one();
        Ok(outcome)
    }

    /// Take the most urgent item, blocking while the queue is empty.
    ///
    /// Among items with the same priority the earliest arrival is returned.
    /// Fails with [`QueueError::Cancelled`] once shutdown is signalled, even
    /// if items remain.
    pub fn remove(&self) -> QueueResult<Dequeued<T>> {
        let mut ring = self.lock()?;

        let mut outcome = WaitOutcome::Immediate;
        while ring.is_empty() && !self.token.is_cancelled() {
            outcome = WaitOutcome::Waited;
            ring = handle_mutex_poison(self.shared.not_empty.wait(ring), |message| {
                QueueError::Synchronisation { message }
            })?;
        }

        if self.token.is_cancelled() {
            return Err(QueueError::Cancelled);
        }

        let item = ring.pop_highest().ok_or_else(|| QueueError::Synchronisation {
            message: "queue empty after wait completed".to_string(),
        })?;
        self.shared.not_full.notify_one();
        Ok(Dequeued { item, outcome })
    }

    /// Current occupancy. Advisory only: it may change as soon as it is read.
    pub fn size(&self) -> usize {
        self.read(|ring| ring.len())
    }

    pub fn is_full(&self) -> bool {
        self.read(|ring| ring.is_full())
    }

    pub fn is_empty(&self) -> bool {
        self.read(|ring| ring.is_empty())
    }

    pub fn capacity(&self) -> usize {
        self.read(|ring| ring.capacity())
    }

    /// Returns `true` once the shared token has been signalled; the queue is
    /// then draining and every blocking call fails fast.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Signal the shared token, unblocking every waiter on every queue that
    /// shares it. Idempotent.
    pub fn signal_shutdown(&self) -> bool {
        self.token.signal()
    }

    /// Take every item still held, in arrival order. Intended for accounting
    /// after all workers have been joined.
    pub fn drain(&self) -> Vec<T> {
        let mut ring = self.shared.ring.lock().unwrap_or_else(PoisonError::into_inner);
        let items = ring.drain();
        self.shared.not_full.notify_all();
        items
    }

    /// Snapshot of the priorities currently held, in arrival order
    pub fn priorities(&self) -> Vec<T::Key> {
        self.read(|ring| ring.iter().map(Prioritized::priority).collect())
    }

    // Advisory reads never fail; a poisoned ring still has a valid count
    fn read<R>(&self, f: impl FnOnce(&PriorityRing<T>) -> R) -> R {
        let ring = self.shared.ring.lock().unwrap_or_else(PoisonError::into_inner);
        f(&ring)
    }
}

impl<T: Prioritized> fmt::Debug for PriorityQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("capacity", &self.capacity())
            .field("size", &self.size())
            .field("cancelled", &self.is_cancelled())
            .finish_non_exhaustive()
    }
}
