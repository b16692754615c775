//! Domain-specific configuration modules

pub mod endpoint;
pub mod http;
pub mod logging;
pub mod output;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main schedview configuration combining all domains
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SchedviewConfig {
    /// GraphQL endpoint configuration
    #[serde(default)]
    pub endpoint: endpoint::EndpointConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,

    /// Output rendering configuration
    #[serde(default)]
    pub output: output::OutputConfig,
}

impl SchedviewConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.endpoint.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        self.output.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> ConfigResult<String> {
        let config = SchedviewConfig::default();
        Ok(serde_yaml::to_string(&config)?)
    }

    /// Render as YAML with secrets masked
    pub fn to_redacted_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(&self.redacted())?)
    }

    /// Render as pretty JSON with secrets masked
    pub fn to_redacted_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(&self.redacted())?)
    }

    /// Copy with the auth token masked, for display
    pub fn redacted(&self) -> SchedviewConfig {
        let mut config = self.clone();
        if config.endpoint.auth_token.is_some() {
            config.endpoint.auth_token = Some("********".to_string());
        }
        config
    }
}
