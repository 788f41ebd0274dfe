//! Work items carried by the queue

use serde::Serialize;
use std::fmt;
use std::time::{Duration, Instant};

/// Anything the queue can order by urgency.
///
/// Higher keys are dequeued first; equal keys leave in arrival order.
pub trait Prioritized {
    type Key: Ord + Copy;

    fn priority(&self) -> Self::Key;
}

/// Ordered urgency key; higher is more urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Priority(pub u8);

impl Priority {
    pub const LOW: Priority = Priority(0);
    pub const NORMAL: Priority = Priority(5);
    pub const HIGH: Priority = Priority(9);

    /// Band a produced value into a priority: 7 and above is high, 4 to 6 is
    /// normal, anything lower is low.
    pub fn for_value(value: u32) -> Priority {
        match value {
            7.. => Priority::HIGH,
            4..=6 => Priority::NORMAL,
            _ => Priority::LOW,
        }
    }

    /// Human-readable band name for the well-known levels
    pub fn label(self) -> Option<&'static str> {
        match self {
            Priority::HIGH => Some("High"),
            Priority::NORMAL => Some("Normal"),
            Priority::LOW => Some("Low"),
            _ => None,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable unit of work handed from a producer, through the queue, to a consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    value: u32,
    priority: Priority,
    origin: usize,
    created_at: Instant,
    sequence: u64,
}

impl Item {
    /// Create an item stamped with the current instant
    pub fn new(value: u32, priority: Priority, origin: usize, sequence: u64) -> Self {
        Self::with_created_at(value, priority, origin, sequence, Instant::now())
    }

    pub fn with_created_at(
        value: u32,
        priority: Priority,
        origin: usize,
        sequence: u64,
        created_at: Instant,
    ) -> Self {
        Self {
            value,
            priority,
            origin,
            created_at,
            sequence,
        }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Identifier of the producer that created this item
    pub fn origin(&self) -> usize {
        self.origin
    }

    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Per-origin sequence number, starting at 1
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Time elapsed since the item was produced
    pub fn latency(&self) -> Duration {
        self.created_at.elapsed()
    }
}

impl Prioritized for Item {
    type Key = Priority;

    fn priority(&self) -> Priority {
        self.priority
    }
}
