//! Producer and Consumer Workers
//!
//! Each worker is a named OS thread that drives the shared queue through its
//! public blocking operations, one attempt per iteration, and reports what it
//! observed to the [`Metrics`] aggregator. Workers translate
//! [`QueueError::Cancelled`](crate::queue::QueueError::Cancelled) into a clean
//! loop exit and return a [`WorkerReport`] when joined.
//!
//! ```text
//!   Producer ── insert ──▶ ┌──────────────┐ ── remove ──▶ Consumer
//!      │                   │ PriorityQueue│                  │
//!      │ record_produced   └──────────────┘  record_consumed │
//!      └──────────────────────▶ Metrics ◀────────────────────┘
//! ```
//!
//! Between attempts a worker pauses for a random 1..=`max_wait` units,
//! waking immediately if shutdown is signalled.

mod consumer;
mod producer;

pub use consumer::Consumer;
pub use producer::{Producer, MAX_ITEM_VALUE};

use crate::core::error_handling::ContextualError;
use crate::core::shutdown::CancellationToken;
use crate::metrics::Metrics;
use crate::queue::{Item, PriorityQueue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Which side of the queue a worker drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Producer,
    Consumer,
}

impl Role {
    /// Short tag used in log lines and thread names: `P` or `C`
    pub fn tag(self) -> char {
        match self {
            Role::Producer => 'P',
            Role::Consumer => 'C',
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Producer => f.write_str("Producer"),
            Role::Consumer => f.write_str("Consumer"),
        }
    }
}

/// Pacing and randomness shared by every worker of one role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSettings {
    /// Upper bound, in units, of the pause between two attempts
    pub max_wait: u32,
    pub wait_unit: Duration,
    /// Fixed seed for reproducible runs; entropy when `None`
    pub seed: Option<u64>,
}

impl WorkerSettings {
    /// Independent generator for one worker. Seeded runs mix the worker's
    /// role and id into the seed so no two workers share a stream.
    fn rng_for(&self, role: Role, id: usize) -> StdRng {
        match self.seed {
            Some(seed) => {
                let salt = (id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
                let role_bit = match role {
                    Role::Producer => 0,
                    Role::Consumer => 1u64 << 63,
                };
                StdRng::seed_from_u64(seed ^ salt ^ role_bit)
            }
            None => StdRng::from_entropy(),
        }
    }
}

/// Everything a worker thread needs, cheap to clone per worker
#[derive(Clone)]
pub struct WorkerContext {
    pub queue: Arc<PriorityQueue<Item>>,
    pub metrics: Arc<Metrics>,
    pub token: CancellationToken,
}

/// What a worker did before it stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerReport {
    pub role: Role,
    pub id: usize,
    /// Items successfully inserted (producer) or removed (consumer)
    pub handled: u64,
}

impl WorkerReport {
    pub fn name(&self) -> String {
        format!("{} {}", self.role, self.id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Failed to spawn worker thread {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Worker thread {name} panicked")]
    Panicked { name: String },
}

impl ContextualError for WorkerError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<String> {
        None
    }
}

/// A running worker thread
pub struct WorkerHandle {
    name: String,
    handle: JoinHandle<WorkerReport>,
}

impl WorkerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block until the worker exits
    pub fn join(self) -> Result<WorkerReport, WorkerError> {
        self.handle
            .join()
            .map_err(|_| WorkerError::Panicked { name: self.name })
    }
}

fn spawn_named(
    role: Role,
    id: usize,
    body: impl FnOnce() -> WorkerReport + Send + 'static,
) -> Result<WorkerHandle, WorkerError> {
    let name = format!("{}{}", role.tag(), id);
    let handle = thread::Builder::new()
        .name(name.clone())
        .spawn(body)
        .map_err(|source| WorkerError::Spawn {
            name: name.clone(),
            source,
        })?;
    Ok(WorkerHandle { name, handle })
}

/// Start producer `id` (1-based) on its own thread
pub fn spawn_producer(
    id: usize,
    context: WorkerContext,
    settings: &WorkerSettings,
) -> Result<WorkerHandle, WorkerError> {
    let producer = Producer::new(id, context, settings);
    spawn_named(Role::Producer, id, move || producer.run())
}

/// Start consumer `id` (1-based) on its own thread
pub fn spawn_consumer(
    id: usize,
    context: WorkerContext,
    settings: &WorkerSettings,
) -> Result<WorkerHandle, WorkerError> {
    let consumer = Consumer::new(id, context, settings);
    spawn_named(Role::Consumer, id, move || consumer.run())
}

/// Sleep a random 1..=`max_wait` units, one unit at a time.
/// Returns `true` if shutdown interrupted the pause.
fn pause(token: &CancellationToken, rng: &mut StdRng, settings: &WorkerSettings) -> bool {
    let units = rng.gen_range(1..=settings.max_wait.max(1));
    for _ in 0..units {
        if token.sleep(settings.wait_unit) {
            return true;
        }
    }
    false
}
