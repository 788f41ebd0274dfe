//! Metrics Aggregator
//!
//! Passive, thread-safe counters that workers update after every queue
//! operation, and the summary report built from them at the end of a run.
//! The aggregator has no ordering relationship with the queue; it only
//! records what workers observed.

mod aggregator;
mod report;

pub use aggregator::{Metrics, MetricsSnapshot, Utilisation};
pub use report::{LatencySummary, PriorityShare, RunContext, SummaryFormat, SummaryReport};
