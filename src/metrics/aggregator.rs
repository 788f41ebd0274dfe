//! Thread-safe counters shared by every worker

use crate::queue::Priority;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Share of attempts that had to wait above which the queue is considered
/// frequently full or frequently empty
const BLOCK_RATIO_THRESHOLD: f64 = 0.2;

/// Point-in-time copy of every counter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub produced: u64,
    pub consumed: u64,
    pub producer_blocks: u64,
    pub consumer_blocks: u64,
    pub consumed_by_priority: BTreeMap<Priority, u64>,
    pub total_latency: Duration,
    pub min_latency: Option<Duration>,
    pub max_latency: Option<Duration>,
}

/// How well the queue capacity matched the workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Utilisation {
    FrequentlyFull,
    FrequentlyEmpty,
    WellBalanced,
}

impl Utilisation {
    pub fn advice(self) -> &'static str {
        match self {
            Utilisation::FrequentlyFull => "consider increasing the queue size",
            Utilisation::FrequentlyEmpty => "queue underutilised, consumers starved",
            Utilisation::WellBalanced => "producers and consumers are matched",
        }
    }
}

impl std::fmt::Display for Utilisation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Utilisation::FrequentlyFull => "FREQUENTLY FULL",
            Utilisation::FrequentlyEmpty => "FREQUENTLY EMPTY",
            Utilisation::WellBalanced => "WELL-BALANCED",
        };
        f.write_str(label)
    }
}

impl MetricsSnapshot {
    /// Items produced but not (yet) consumed
    pub fn in_flight(&self) -> u64 {
        self.produced.saturating_sub(self.consumed)
    }

    pub fn average_latency(&self) -> Option<Duration> {
        if self.consumed == 0 {
            return None;
        }
        let nanos = self.total_latency.as_nanos() / u128::from(self.consumed);
        Some(Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX)))
    }

    pub fn consumed_with(&self, priority: Priority) -> u64 {
        self.consumed_by_priority
            .get(&priority)
            .copied()
            .unwrap_or(0)
    }

    /// Percentage of successful inserts that had to wait for space
    pub fn producer_block_rate(&self) -> Option<f64> {
        percentage(self.producer_blocks, self.produced)
    }

    /// Percentage of successful removes that had to wait for an item
    pub fn consumer_block_rate(&self) -> Option<f64> {
        percentage(self.consumer_blocks, self.consumed)
    }

    /// Consumed as a percentage of produced
    pub fn efficiency(&self) -> Option<f64> {
        if self.consumed == 0 {
            return None;
        }
        percentage(self.consumed, self.produced)
    }

    pub fn utilisation(&self) -> Utilisation {
        if self.producer_blocks as f64 > self.produced as f64 * BLOCK_RATIO_THRESHOLD {
            Utilisation::FrequentlyFull
        } else if self.consumer_blocks as f64 > self.consumed as f64 * BLOCK_RATIO_THRESHOLD {
            Utilisation::FrequentlyEmpty
        } else {
            Utilisation::WellBalanced
        }
    }
}

fn percentage(part: u64, whole: u64) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(100.0 * part as f64 / whole as f64)
    }
}

/// Aggregates throughput, blocking and latency counters under one lock.
///
/// Every operation is O(1). The counters are plain data, so a panic in one
/// worker never makes them unusable for the others.
#[derive(Debug, Default)]
pub struct Metrics {
    inner: Mutex<MetricsSnapshot>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MetricsSnapshot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn record_produced(&self) {
        self.lock().produced += 1;
    }

    pub fn record_consumed(&self, priority: Priority, latency: Duration) {
        let mut counters = self.lock();
        counters.consumed += 1;
        *counters.consumed_by_priority.entry(priority).or_default() += 1;
        counters.total_latency += latency;
        counters.min_latency = Some(counters.min_latency.map_or(latency, |min| min.min(latency)));
        counters.max_latency = Some(counters.max_latency.map_or(latency, |max| max.max(latency)));
    }

    /// An insert had to wait because the queue was full
    pub fn record_producer_blocked(&self) {
        self.lock().producer_blocks += 1;
    }

    /// A remove had to wait because the queue was empty
    pub fn record_consumer_blocked(&self) {
        self.lock().consumer_blocks += 1;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.lock().clone()
    }
}
