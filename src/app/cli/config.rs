//! TOML configuration file loading
//!
//! The file uses the long option names as keys:
//!
//! ```toml
//! producers = 4
//! consumers = 2
//! capacity = 10
//! timeout = 30
//! max-producer-wait = 3
//! max-consumer-wait = 4
//! wait-unit-ms = 1000
//! seed = 42
//! summary-format = "text"
//! log-level = "debug"
//! log-format = "ext"
//! log-file = "none"
//! color = true
//! ```
//!
//! Without `--config-file` the default `<config dir>/Prioqueue/prioqueue.toml`
//! is read when present. A file named explicitly must exist.

use super::args::Args;
use super::error::ConfigError;
use std::path::{Path, PathBuf};

/// `<config dir>/Prioqueue/prioqueue.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("Prioqueue").join("prioqueue.toml"))
}

/// Pick the file to load: the explicit one (which must exist) or the default
/// one when it exists.
fn config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match explicit {
        Some(path) if !path.exists() => Err(ConfigError::MissingFile {
            path: path.to_path_buf(),
        }),
        Some(path) => Ok(Some(path.to_path_buf())),
        None => Ok(default_config_path().filter(|path| path.exists())),
    }
}

impl Args {
    /// Load the configuration file, if any, into a fresh `Args`.
    ///
    /// Returns the path that was read alongside the values so the caller can
    /// log it.
    pub async fn load_config_file(
        explicit: Option<&Path>,
    ) -> Result<Option<(PathBuf, Args)>, ConfigError> {
        let Some(path) = config_path(explicit)? else {
            return Ok(None);
        };

        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
        let table = toml::from_str::<toml::Table>(&contents).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;

        let mut args = Args::default();
        Self::apply_toml_values(&mut args, &table)?;
        Ok(Some((path, args)))
    }

    /// Apply TOML configuration values to Args
    pub fn apply_toml_values(args: &mut Self, config: &toml::Table) -> Result<(), ConfigError> {
        if let Some(producers) = Self::count_field(config, "producers")? {
            args.producers = Some(producers as usize);
        }
        if let Some(consumers) = Self::count_field(config, "consumers")? {
            args.consumers = Some(consumers as usize);
        }
        // "queue-size" is accepted as an alias
        for key in ["capacity", "queue-size"] {
            if let Some(capacity) = Self::count_field(config, key)? {
                args.capacity = Some(capacity as usize);
            }
        }
        if let Some(timeout) = Self::count_field(config, "timeout")? {
            args.timeout = Some(timeout);
        }
        if let Some(wait) = Self::count_field(config, "max-producer-wait")? {
            args.max_producer_wait = Some(Self::narrow("max-producer-wait", wait)?);
        }
        if let Some(wait) = Self::count_field(config, "max-consumer-wait")? {
            args.max_consumer_wait = Some(Self::narrow("max-consumer-wait", wait)?);
        }
        if let Some(unit) = Self::count_field(config, "wait-unit-ms")? {
            args.wait_unit_ms = Some(unit);
        }
        if let Some(seed) = Self::count_field(config, "seed")? {
            args.seed = Some(seed);
        }

        if let Some(format) = Self::string_field(config, "summary-format")? {
            args.summary_format = Some(format);
        }
        if let Some(log_level) = Self::string_field(config, "log-level")? {
            args.log_level = Some(log_level);
        }
        if let Some(log_format) = Self::string_field(config, "log-format")? {
            args.log_format = Some(log_format);
        }
        if let Some(log_file) = Self::string_field(config, "log-file")? {
            args.log_file = Some(PathBuf::from(log_file));
        }

        if let Some(color) = Self::bool_field(config, "color")? {
            args.color = color;
            args.no_color = !color;
        }
        if let Some(no_color) = Self::bool_field(config, "no-color")? {
            args.no_color = no_color;
            args.color = !no_color;
        }

        Ok(())
    }

    fn count_field(config: &toml::Table, key: &str) -> Result<Option<u64>, ConfigError> {
        let Some(value) = config.get(key) else {
            return Ok(None);
        };
        let integer = value.as_integer().ok_or_else(|| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected an integer, found {}", value.type_str()),
        })?;
        u64::try_from(integer)
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{} is negative", integer),
            })
    }

    fn narrow(key: &str, value: u64) -> Result<u32, ConfigError> {
        u32::try_from(value).map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{} is too large", value),
        })
    }

    fn string_field(config: &toml::Table, key: &str) -> Result<Option<String>, ConfigError> {
        match config.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_str()
                .map(|s| Some(s.to_string()))
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("expected a string, found {}", value.type_str()),
                }),
        }
    }

    fn bool_field(config: &toml::Table, key: &str) -> Result<Option<bool>, ConfigError> {
        match config.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_bool()
                .map(Some)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: format!("expected true or false, found {}", value.type_str()),
                }),
        }
    }
}
