//! Domain-driven configuration management for schedview
//!
//! Configuration is split by functional domain (endpoint, http, logging,
//! output), loaded from YAML, overridden from `SCHEDVIEW_*` environment
//! variables and validated per domain.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    endpoint::EndpointConfig, http::HttpConfig, logging::LoggingConfig, output::OutputConfig,
    SchedviewConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
