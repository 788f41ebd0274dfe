//! Command-line and configuration file handling

mod args;
mod config;
mod error;
mod validation;

pub use args::Args;
pub use config::default_config_path;
pub use error::ConfigError;
pub use validation::{
    LogSettings, RunConfig, DEFAULT_MAX_CONSUMER_WAIT, DEFAULT_MAX_PRODUCER_WAIT,
    DEFAULT_WAIT_UNIT_MS, MAX_CONSUMERS, MAX_PRODUCERS,
};
