//! End-of-run summary report
//!
//! Turns a [`MetricsSnapshot`] plus the run parameters into a
//! [`SummaryReport`], rendered either as styled tables or as JSON.
//!
//! ```text
//! ┌ Throughput ──────────┐  ┌ Latency ─┐  ┌ Priority Distribution ┐
//! │ produced / consumed  │  │ avg      │  │ High   12  (40.0%)    │
//! │ in flight, remaining │  │ min, max │  │ Normal  9  (30.0%)    │
//! │ rates                │  └──────────┘  │ Low     9  (30.0%)    │
//! └──────────────────────┘                └───────────────────────┘
//! ┌ Blocking Events ─────┐  ┌ Utilisation ─────────┐  ┌ Workers ┐
//! └──────────────────────┘  └──────────────────────┘  └─────────┘
//! ```

use super::aggregator::{MetricsSnapshot, Utilisation};
use crate::core::styles::StyleRole;
use crate::queue::Priority;
use crate::worker::WorkerReport;
use prettytable::{format, Cell, Row, Table};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Output format for the summary report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for SummaryFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(SummaryFormat::Text),
            "json" => Ok(SummaryFormat::Json),
            other => Err(format!(
                "Unknown summary format '{}' (expected 'text' or 'json')",
                other
            )),
        }
    }
}

impl fmt::Display for SummaryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummaryFormat::Text => f.write_str("text"),
            SummaryFormat::Json => f.write_str("json"),
        }
    }
}

/// Run parameters needed to turn raw counters into rates
#[derive(Debug, Clone)]
pub struct RunContext {
    pub runtime: Duration,
    pub producers: usize,
    pub consumers: usize,
    pub capacity: usize,
    /// Items still held by the queue after every worker was joined
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    pub average_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityShare {
    pub priority: Priority,
    pub label: String,
    pub count: u64,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub runtime_secs: f64,
    pub producers: usize,
    pub consumers: usize,
    pub capacity: usize,
    pub produced: u64,
    pub consumed: u64,
    pub in_flight: u64,
    pub remaining: usize,
    pub production_rate: Option<f64>,
    pub consumption_rate: Option<f64>,
    pub per_producer_rate: Option<f64>,
    pub per_consumer_rate: Option<f64>,
    pub latency: Option<LatencySummary>,
    pub priorities: Vec<PriorityShare>,
    pub producer_blocks: u64,
    pub consumer_blocks: u64,
    pub producer_block_rate: Option<f64>,
    pub consumer_block_rate: Option<f64>,
    pub utilisation: Utilisation,
    pub efficiency: Option<f64>,
    pub workers: Vec<WorkerReport>,
}

fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

fn per_second(count: u64, runtime: f64) -> Option<f64> {
    (runtime > 0.0).then(|| count as f64 / runtime)
}

fn per_worker(rate: Option<f64>, workers: usize) -> Option<f64> {
    rate.filter(|_| workers > 0).map(|rate| rate / workers as f64)
}

impl SummaryReport {
    pub fn new(snapshot: &MetricsSnapshot, context: &RunContext, workers: Vec<WorkerReport>) -> Self {
        let runtime = context.runtime.as_secs_f64();
        let production_rate = per_second(snapshot.produced, runtime);
        let consumption_rate = per_second(snapshot.consumed, runtime);

        let latency = match (
            snapshot.average_latency(),
            snapshot.min_latency,
            snapshot.max_latency,
        ) {
            (Some(average), Some(min), Some(max)) => Some(LatencySummary {
                average_ms: millis(average),
                min_ms: millis(min),
                max_ms: millis(max),
            }),
            _ => None,
        };

        Self {
            runtime_secs: runtime,
            producers: context.producers,
            consumers: context.consumers,
            capacity: context.capacity,
            produced: snapshot.produced,
            consumed: snapshot.consumed,
            in_flight: snapshot.in_flight(),
            remaining: context.remaining,
            production_rate,
            consumption_rate,
            per_producer_rate: per_worker(production_rate, context.producers),
            per_consumer_rate: per_worker(consumption_rate, context.consumers),
            latency,
            priorities: Self::priority_shares(snapshot),
            producer_blocks: snapshot.producer_blocks,
            consumer_blocks: snapshot.consumer_blocks,
            producer_block_rate: snapshot.producer_block_rate(),
            consumer_block_rate: snapshot.consumer_block_rate(),
            utilisation: snapshot.utilisation(),
            efficiency: snapshot.efficiency(),
            workers,
        }
    }

    // Well-known bands first (always listed), then any other observed keys
    fn priority_shares(snapshot: &MetricsSnapshot) -> Vec<PriorityShare> {
        let mut keys = vec![Priority::HIGH, Priority::NORMAL, Priority::LOW];
        keys.extend(
            snapshot
                .consumed_by_priority
                .keys()
                .rev()
                .filter(|key| key.label().is_none()),
        );

        keys.into_iter()
            .map(|priority| {
                let count = snapshot.consumed_with(priority);
                let percent = if snapshot.consumed == 0 {
                    0.0
                } else {
                    100.0 * count as f64 / snapshot.consumed as f64
                };
                PriorityShare {
                    priority,
                    label: priority
                        .label()
                        .map_or_else(|| format!("Priority {}", priority), str::to_string),
                    count,
                    percent,
                }
            })
            .collect()
    }

    pub fn render(&self, format: SummaryFormat, color: bool) -> Result<String, serde_json::Error> {
        match format {
            SummaryFormat::Text => Ok(self.render_text(color)),
            SummaryFormat::Json => serde_json::to_string_pretty(self),
        }
    }

    pub fn render_text(&self, color: bool) -> String {
        let mut out = String::new();
        out.push_str(&StyleRole::Header.paint("Performance Summary", color));
        out.push('\n');

        let throughput = vec![
            ("Items produced", self.produced.to_string()),
            ("Items consumed", self.consumed.to_string()),
            ("Items in flight", self.in_flight.to_string()),
            ("Remaining in queue", self.remaining.to_string()),
            ("Production rate", rate_text(self.production_rate, "items/s")),
            ("Consumption rate", rate_text(self.consumption_rate, "items/s")),
            (
                "Per-producer rate",
                rate_text(self.per_producer_rate, "items/s/producer"),
            ),
            (
                "Per-consumer rate",
                rate_text(self.per_consumer_rate, "items/s/consumer"),
            ),
        ];
        out.push_str(&section("Throughput", &throughput, color).to_string());

        if let Some(latency) = &self.latency {
            let rows = vec![
                ("Average", format!("{:.3} ms", latency.average_ms)),
                ("Minimum", format!("{:.3} ms", latency.min_ms)),
                ("Maximum", format!("{:.3} ms", latency.max_ms)),
            ];
            out.push_str(&section("Latency", &rows, color).to_string());
        }

        if self.consumed > 0 {
            let rows: Vec<(String, String)> = self
                .priorities
                .iter()
                .map(|share| {
                    (
                        format!("{} ({})", share.label, share.priority),
                        format!("{} ({:.1}%)", share.count, share.percent),
                    )
                })
                .collect();
            let rows: Vec<(&str, String)> = rows
                .iter()
                .map(|(key, value)| (key.as_str(), value.clone()))
                .collect();
            out.push_str(&section("Priority Distribution", &rows, color).to_string());
        }

        let blocking = vec![
            (
                "Producer blocks",
                format!("{} (queue full)", self.producer_blocks),
            ),
            (
                "Consumer blocks",
                format!("{} (queue empty)", self.consumer_blocks),
            ),
            (
                "Producer block rate",
                percent_text(self.producer_block_rate, "of writes"),
            ),
            (
                "Consumer block rate",
                percent_text(self.consumer_block_rate, "of reads"),
            ),
        ];
        out.push_str(&section("Blocking Events", &blocking, color).to_string());

        let status_role = match self.utilisation {
            Utilisation::WellBalanced => StyleRole::Valid,
            _ => StyleRole::Invalid,
        };
        let assessment = vec![
            (
                "Queue status",
                format!(
                    "{} ({})",
                    status_role.paint(&self.utilisation.to_string(), color),
                    self.utilisation.advice()
                ),
            ),
            ("Efficiency", percent_text(self.efficiency, "consumed/produced")),
        ];
        out.push_str(&section("Utilisation", &assessment, color).to_string());

        if !self.workers.is_empty() {
            let rows: Vec<(String, String)> = self
                .workers
                .iter()
                .map(|worker| (worker.name(), worker.handled.to_string()))
                .collect();
            let rows: Vec<(&str, String)> = rows
                .iter()
                .map(|(key, value)| (key.as_str(), value.clone()))
                .collect();
            out.push_str(&section("Workers", &rows, color).to_string());
        }

        out
    }
}

fn rate_text(rate: Option<f64>, unit: &str) -> String {
    rate.map_or_else(|| "n/a".to_string(), |rate| format!("{:.2} {}", rate, unit))
}

fn percent_text(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(
        || "n/a".to_string(),
        |value| format!("{:.1}% {}", value, suffix),
    )
}

/// Two-column key/value table with a styled title row
fn section(title: &str, rows: &[(&str, String)], color: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);

    let mut heading = Cell::new(title);
    if color {
        if let Some(spec) = StyleRole::Header.to_prettytable_spec() {
            heading = heading.style_spec(&format!("b{}", spec));
        }
    }
    table.set_titles(Row::new(vec![heading, Cell::new("")]));

    for (key, value) in rows {
        let mut key_cell = Cell::new(key);
        if color {
            if let Some(spec) = StyleRole::Key.to_prettytable_spec() {
                key_cell = key_cell.style_spec(&spec);
            }
        }
        table.add_row(Row::new(vec![key_cell, Cell::new(value)]));
    }
    table
}
