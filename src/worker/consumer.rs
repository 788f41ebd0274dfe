//! Consumer role: remove the most urgent item until shutdown

use super::{pause, Role, WorkerContext, WorkerReport, WorkerSettings};
use crate::queue::{Dequeued, Prioritized};
use rand::rngs::StdRng;

pub struct Consumer {
    id: usize,
    context: WorkerContext,
    settings: WorkerSettings,
    rng: StdRng,
}

impl Consumer {
    pub fn new(id: usize, context: WorkerContext, settings: &WorkerSettings) -> Self {
        Self {
            id,
            context,
            rng: settings.rng_for(Role::Consumer, id),
            settings: settings.clone(),
        }
    }

    pub fn run(mut self) -> WorkerReport {
        let WorkerContext {
            queue,
            metrics,
            token,
        } = self.context.clone();
        let mut consumed = 0u64;
        log::debug!("[C{}] Consumer thread started", self.id);

        loop {
            match queue.remove() {
                Ok(Dequeued { item, outcome }) => {
                    let latency = item.latency();
                    consumed += 1;
                    metrics.record_consumed(item.priority(), latency);
                    log::info!(
                        "[C{}] READ  <- seq={}, value={}, priority={}, from P{}, latency={:.3}s, queue_size={}",
                        self.id,
                        item.sequence(),
                        item.value(),
                        item.priority(),
                        item.origin(),
                        latency.as_secs_f64(),
                        queue.size()
                    );
                    if outcome.waited() {
                        metrics.record_consumer_blocked();
                        log::info!("[C{}] STARVED (queue was empty, waited for data)", self.id);
                    }
                }
                Err(e) if e.is_cancelled() => break,
                Err(e) => {
                    log::error!("[C{}] {}", self.id, e);
                    break;
                }
            }

            if pause(&token, &mut self.rng, &self.settings) {
                break;
            }
        }

        log::debug!(
            "[C{}] Consumer thread terminating (consumed {} items)",
            self.id,
            consumed
        );
        WorkerReport {
            role: Role::Consumer,
            id: self.id,
            handled: consumed,
        }
    }
}
