//! Producer role: build items and insert them until shutdown

use super::{pause, Role, WorkerContext, WorkerReport, WorkerSettings};
use crate::queue::{Item, Prioritized, Priority};
use rand::rngs::StdRng;
use rand::Rng;

/// Largest value a producer draws; values map onto priority bands
pub const MAX_ITEM_VALUE: u32 = 9;

pub struct Producer {
    id: usize,
    context: WorkerContext,
    settings: WorkerSettings,
    rng: StdRng,
    sequence: u64,
}

impl Producer {
    pub fn new(id: usize, context: WorkerContext, settings: &WorkerSettings) -> Self {
        Self {
            id,
            context,
            rng: settings.rng_for(Role::Producer, id),
            settings: settings.clone(),
            sequence: 0,
        }
    }

    /// Draw the next item: a value in 0..=9 banded into a priority, stamped
    /// with this producer's id and the next sequence number.
    pub fn next_item(&mut self) -> Item {
        self.sequence += 1;
        let value = self.rng.gen_range(0..=MAX_ITEM_VALUE);
        Item::new(value, Priority::for_value(value), self.id, self.sequence)
    }

    pub fn run(mut self) -> WorkerReport {
        let WorkerContext {
            queue,
            metrics,
            token,
        } = self.context.clone();
        let mut produced = 0u64;
        log::debug!("[P{}] Producer thread started", self.id);

        while !token.is_cancelled() {
            let item = self.next_item();
            log::info!(
                "[P{}] WRITE -> seq={}, value={}, priority={}, queue_size={}",
                self.id,
                item.sequence(),
                item.value(),
                item.priority(),
                queue.size()
            );

            match queue.insert(item) {
                Ok(outcome) => {
                    produced += 1;
                    metrics.record_produced();
                    if outcome.waited() {
                        metrics.record_producer_blocked();
                        log::info!("[P{}] BLOCKED (queue was full, waited for space)", self.id);
                    }
                }
                Err(rejected) if rejected.is_cancelled() => {
                    log::debug!(
                        "[P{}] Shutdown before seq={} was queued",
                        self.id,
                        rejected.into_inner().sequence()
                    );
                    break;
                }
                Err(rejected) => {
                    log::error!("[P{}] {}", self.id, rejected);
                    break;
                }
            }

            if pause(&token, &mut self.rng, &self.settings) {
                break;
            }
        }

        log::debug!(
            "[P{}] Producer thread terminating (produced {} items)",
            self.id,
            produced
        );
        WorkerReport {
            role: Role::Producer,
            id: self.id,
            handled: produced,
        }
    }
}
