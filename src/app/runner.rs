//! One complete run
//!
//! Builds the queue and metrics, spawns the workers, waits for the run timer
//! or a signal, then signals the token and joins every worker before the
//! queue is drained and torn down.
//!
//! ```text
//!  spawn P1..Pn, C1..Cm ──▶ wait_for_stop ──▶ trigger_shutdown ──▶ join all ──▶ drain
//!                           (timer | signal)   (token.signal)      (spawn_blocking)
//! ```

use super::cli::RunConfig;
use crate::core::error_handling::{log_error_with_context, ContextualError};
use crate::core::shutdown::{ShutdownCoordinator, StopReason};
use crate::metrics::{Metrics, MetricsSnapshot, RunContext, SummaryReport};
use crate::queue::{Item, PriorityQueue, QueueError};
use crate::worker::{
    spawn_consumer, spawn_producer, WorkerContext, WorkerError, WorkerHandle, WorkerReport,
};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Worker(#[from] WorkerError),

    #[error("Failed to join worker threads: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl ContextualError for RunError {
    fn is_user_actionable(&self) -> bool {
        match self {
            RunError::Queue(e) => e.is_user_actionable(),
            RunError::Worker(e) => e.is_user_actionable(),
            RunError::Join(_) => false,
        }
    }

    fn user_message(&self) -> Option<String> {
        match self {
            RunError::Queue(e) => e.user_message(),
            RunError::Worker(e) => e.user_message(),
            RunError::Join(_) => None,
        }
    }
}

/// Everything observed during a run, collected after all workers exited
#[derive(Debug)]
pub struct RunOutcome {
    pub reason: StopReason,
    pub runtime: Duration,
    pub snapshot: MetricsSnapshot,
    pub workers: Vec<WorkerReport>,
    /// Items still queued when the run stopped, in arrival order
    pub remaining: Vec<Item>,
    /// Workers that panicked instead of returning a report
    pub failures: usize,
}

impl RunOutcome {
    pub fn report(&self, config: &RunConfig) -> SummaryReport {
        let context = RunContext {
            runtime: self.runtime,
            producers: config.producers,
            consumers: config.consumers,
            capacity: config.capacity,
            remaining: self.remaining.len(),
        };
        SummaryReport::new(&self.snapshot, &context, self.workers.clone())
    }
}

fn spawn_all(
    config: &RunConfig,
    context: &WorkerContext,
    handles: &mut Vec<WorkerHandle>,
) -> Result<(), WorkerError> {
    log::info!("[INIT] Creating {} producer thread(s)", config.producers);
    for id in 1..=config.producers {
        let handle = spawn_producer(id, context.clone(), &config.producer)?;
        log::debug!("[INIT] Producer {} created", handle.name());
        handles.push(handle);
    }

    log::info!("[INIT] Creating {} consumer thread(s)", config.consumers);
    for id in 1..=config.consumers {
        let handle = spawn_consumer(id, context.clone(), &config.consumer)?;
        log::debug!("[INIT] Consumer {} created", handle.name());
        handles.push(handle);
    }
    Ok(())
}

/// Join every worker off the async thread. Panicked workers are logged and
/// counted rather than aborting the join of the others.
async fn join_all(handles: Vec<WorkerHandle>) -> Result<(Vec<WorkerReport>, usize), RunError> {
    let results = tokio::task::spawn_blocking(move || {
        handles
            .into_iter()
            .map(|handle| {
                let name = handle.name().to_string();
                let result = handle.join();
                if result.is_ok() {
                    log::debug!("[CLEANUP] {} joined", name);
                }
                result
            })
            .collect::<Vec<_>>()
    })
    .await?;

    let mut reports = Vec::with_capacity(results.len());
    let mut failures = 0;
    for result in results {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => {
                failures += 1;
                log_error_with_context(&e, "Joining worker threads");
            }
        }
    }
    Ok((reports, failures))
}

/// Run producers and consumers until the configured time elapses or the
/// coordinator is triggered.
pub async fn run(
    config: &RunConfig,
    coordinator: &ShutdownCoordinator,
) -> Result<RunOutcome, RunError> {
    let token = coordinator.token().clone();
    let queue = Arc::new(PriorityQueue::new(config.capacity, token.clone())?);
    let metrics = Arc::new(Metrics::new());
    let context = WorkerContext {
        queue: Arc::clone(&queue),
        metrics: Arc::clone(&metrics),
        token,
    };

    let mut handles = Vec::with_capacity(config.producers + config.consumers);
    if let Err(e) = spawn_all(config, &context, &mut handles) {
        // Release whatever did start before reporting the failure
        coordinator.trigger_shutdown();
        join_all(handles).await?;
        return Err(e.into());
    }

    log::info!("[RUNNING] All threads created. Press Ctrl+C to stop early, or wait for timeout");
    let started = Instant::now();

    let reason = coordinator.wait_for_stop(config.run_for).await;
    match reason {
        StopReason::Timeout => {
            log::info!("[TIMEOUT] Timeout reached, signalling all threads to terminate")
        }
        StopReason::Interrupted => log::info!("[SHUTDOWN] Stop requested, waiting for threads"),
    }
    coordinator.trigger_shutdown();

    let (workers, failures) = join_all(handles).await?;
    let runtime = started.elapsed();
    let remaining = queue.drain();
    if !remaining.is_empty() {
        log::info!("[CLEANUP] {} item(s) left in the queue", remaining.len());
    }

    Ok(RunOutcome {
        reason,
        runtime,
        snapshot: metrics.snapshot(),
        workers,
        remaining,
        failures,
    })
}
