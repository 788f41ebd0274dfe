//! Turning parsed arguments into a validated run configuration
//!
//! Every problem is collected before reporting, so a user who gets several
//! settings wrong sees all of them at once.

use super::args::Args;
use super::error::ConfigError;
use crate::core::logging::{LOG_FORMATS, LOG_LEVELS};
use crate::core::validation::{check_range, Problems};
use crate::metrics::SummaryFormat;
use crate::queue::DEFAULT_MAX_CAPACITY;
use crate::worker::WorkerSettings;
use std::path::PathBuf;
use std::time::Duration;

pub const MAX_PRODUCERS: usize = 10;
pub const MAX_CONSUMERS: usize = 10;
pub const DEFAULT_MAX_PRODUCER_WAIT: u32 = 3;
pub const DEFAULT_MAX_CONSUMER_WAIT: u32 = 4;
pub const DEFAULT_WAIT_UNIT_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub format: String,
    pub file: Option<PathBuf>,
}

/// Everything needed to start a run, already checked against the limits
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub producers: usize,
    pub consumers: usize,
    pub capacity: usize,
    pub run_for: Duration,
    pub producer: WorkerSettings,
    pub consumer: WorkerSettings,
    pub summary_format: SummaryFormat,
    pub log: LogSettings,
    /// Explicit colour choice; `None` means decide from the terminal
    pub color: Option<bool>,
}

fn required<T: Copy>(problems: &mut Problems, name: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        problems.push(format!("{} is required", name));
    }
    value
}

fn one_of(problems: &mut Problems, name: &str, value: &str, allowed: &[&str]) {
    if !allowed.contains(&value) {
        problems.push(format!(
            "{} must be one of {} (got '{}')",
            name,
            allowed.join(", "),
            value
        ));
    }
}

impl Args {
    /// Validate CLI and configuration values together and build the run
    /// configuration
    pub fn resolve(&self) -> Result<RunConfig, ConfigError> {
        let mut problems = Problems::new();

        let producers = required(&mut problems, "PRODUCERS", self.producers);
        let consumers = required(&mut problems, "CONSUMERS", self.consumers);
        let capacity = required(&mut problems, "CAPACITY", self.capacity);
        let timeout = required(&mut problems, "TIMEOUT_SECONDS", self.timeout);

        if let Some(producers) = producers {
            problems.check(check_range("PRODUCERS", producers, 1..=MAX_PRODUCERS));
        }
        if let Some(consumers) = consumers {
            problems.check(check_range("CONSUMERS", consumers, 1..=MAX_CONSUMERS));
        }
        if let Some(capacity) = capacity {
            problems.check(check_range("CAPACITY", capacity, 1..=DEFAULT_MAX_CAPACITY));
        }
        if timeout == Some(0) {
            problems.push("TIMEOUT_SECONDS must be positive");
        }

        let max_producer_wait = self.max_producer_wait.unwrap_or(DEFAULT_MAX_PRODUCER_WAIT);
        let max_consumer_wait = self.max_consumer_wait.unwrap_or(DEFAULT_MAX_CONSUMER_WAIT);
        let wait_unit_ms = self.wait_unit_ms.unwrap_or(DEFAULT_WAIT_UNIT_MS);
        if max_producer_wait == 0 {
            problems.push("max-producer-wait must be at least 1");
        }
        if max_consumer_wait == 0 {
            problems.push("max-consumer-wait must be at least 1");
        }
        if wait_unit_ms == 0 {
            problems.push("wait-unit-ms must be at least 1");
        }

        let summary_format = match self.summary_format.as_deref().map(str::parse::<SummaryFormat>) {
            None => SummaryFormat::default(),
            Some(Ok(format)) => format,
            Some(Err(problem)) => {
                problems.push(problem);
                SummaryFormat::default()
            }
        };

        let level = self.log_level.clone().unwrap_or_else(|| "info".to_string());
        let format = self.log_format.clone().unwrap_or_else(|| "text".to_string());
        one_of(&mut problems, "log-level", &level, &LOG_LEVELS);
        one_of(&mut problems, "log-format", &format, &LOG_FORMATS);

        problems
            .into_result()
            .map_err(|problems| ConfigError::Invalid { problems })?;

        // Every required value was checked above
        let (Some(producers), Some(consumers), Some(capacity), Some(timeout)) =
            (producers, consumers, capacity, timeout)
        else {
            return Err(ConfigError::Invalid {
                problems: vec!["missing required arguments".to_string()],
            });
        };

        let wait_unit = Duration::from_millis(wait_unit_ms);
        Ok(RunConfig {
            producers,
            consumers,
            capacity,
            run_for: Duration::from_secs(timeout),
            producer: WorkerSettings {
                max_wait: max_producer_wait,
                wait_unit,
                seed: self.seed,
            },
            consumer: WorkerSettings {
                max_wait: max_consumer_wait,
                wait_unit,
                seed: self.seed,
            },
            summary_format,
            log: LogSettings {
                level,
                format,
                file: self.log_file.clone().filter(|path| {
                    let raw = path.to_string_lossy();
                    !(raw.eq_ignore_ascii_case("none") || raw == "-")
                }),
            },
            color: self.color_choice(),
        })
    }
}
