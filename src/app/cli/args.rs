//! Command-line arguments
//!
//! Every setting is optional at this stage so that a configuration file can
//! supply it; [`Args::resolve`](super::validation) decides what is required.

use crate::core::logging::{LOG_FORMATS, LOG_LEVELS};
use crate::core::styles::palette_to_clap;
use clap::{CommandFactory, FromArgMatches, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default, PartialEq)]
#[command(name = "prioqueue")]
#[command(about = "Bounded priority queue shared by concurrent producers and consumers")]
#[command(version)]
#[command(
    after_help = "Example: prioqueue 5 3 10 30\n  (5 producers, 3 consumers, 10 queue slots, run for 30 seconds)"
)]
pub struct Args {
    /// Number of producer threads
    #[arg(value_name = "PRODUCERS")]
    pub producers: Option<usize>,

    /// Number of consumer threads
    #[arg(value_name = "CONSUMERS")]
    pub consumers: Option<usize>,

    /// Maximum number of queued items
    #[arg(value_name = "CAPACITY")]
    pub capacity: Option<usize>,

    /// Run time in seconds
    #[arg(value_name = "TIMEOUT_SECONDS")]
    pub timeout: Option<u64>,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Longest pause between two writes, in wait units
    #[arg(long = "max-producer-wait", value_name = "UNITS")]
    pub max_producer_wait: Option<u32>,

    /// Longest pause between two reads, in wait units
    #[arg(long = "max-consumer-wait", value_name = "UNITS")]
    pub max_consumer_wait: Option<u32>,

    /// Length of one wait unit in milliseconds
    #[arg(long = "wait-unit-ms", value_name = "MS")]
    pub wait_unit_ms: Option<u64>,

    /// Seed for reproducible item values and pauses
    #[arg(short = 's', long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,

    /// Summary report format
    #[arg(long = "summary-format", value_name = "FORMAT", value_parser = ["text", "json"])]
    pub summary_format: Option<String>,

    /// Force coloured output
    #[arg(long = "color", overrides_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(long = "no-color", overrides_with = "color")]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = LOG_LEVELS)]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = LOG_FORMATS)]
    pub log_format: Option<String>,
}

impl Args {
    /// Parse the process arguments, styling help output when `color` is set.
    /// Exits with clap's usage message on malformed input.
    pub fn parse_with_color(color: bool) -> Self {
        let matches = Self::command().styles(palette_to_clap(color)).get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    /// `Some(true)` for `--color`, `Some(false)` for `--no-color`, `None` for auto
    pub fn color_choice(&self) -> Option<bool> {
        match (self.color, self.no_color) {
            (_, true) => Some(false),
            (true, false) => Some(true),
            (false, false) => None,
        }
    }

    /// Values given on the command line win over `base` (usually loaded from
    /// the configuration file)
    pub fn overlay(self, base: Args) -> Args {
        Args {
            producers: self.producers.or(base.producers),
            consumers: self.consumers.or(base.consumers),
            capacity: self.capacity.or(base.capacity),
            timeout: self.timeout.or(base.timeout),
            config_file: self.config_file.or(base.config_file),
            max_producer_wait: self.max_producer_wait.or(base.max_producer_wait),
            max_consumer_wait: self.max_consumer_wait.or(base.max_consumer_wait),
            wait_unit_ms: self.wait_unit_ms.or(base.wait_unit_ms),
            seed: self.seed.or(base.seed),
            summary_format: self.summary_format.or(base.summary_format),
            color: self.color || (base.color && !self.no_color),
            no_color: self.no_color || (base.no_color && !self.color),
            log_level: self.log_level.or(base.log_level),
            log_file: self.log_file.or(base.log_file),
            log_format: self.log_format.or(base.log_format),
        }
    }
}
