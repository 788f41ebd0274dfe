//! Configuration errors

use crate::core::error_handling::ContextualError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Error reading configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Invalid value for '{key}' in configuration file: {message}")]
    InvalidValue { key: String, message: String },

    #[error("Invalid configuration: {}", problems.join("; "))]
    Invalid { problems: Vec<String> },
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<String> {
        Some(self.to_string())
    }
}
