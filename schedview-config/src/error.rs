//! Configuration error types

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read configuration file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Invalid YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Rendering the configuration as JSON for display
    #[error("Cannot render configuration as JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A `SCHEDVIEW_*` variable holds a value of the wrong type
    #[error("Invalid environment override: {0}")]
    EnvError(String),

    #[error("Domain configuration error in {domain}: {message}")]
    DomainError { domain: String, message: String },
}
