//! Configuration loading and environment variable handling

use crate::domains::SchedviewConfig;
use crate::error::{ConfigError, ConfigResult};
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

const DEFAULT_PREFIX: &str = "SCHEDVIEW";

/// Loads `SchedviewConfig` from YAML and `<PREFIX>_*` environment variables.
///
/// Environment variables win over file values. Every load ends with
/// validation of all domains.
pub struct ConfigLoader {
    prefix: String,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::with_prefix(DEFAULT_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<SchedviewConfig> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        self.from_yaml_str(&content)
    }

    /// An empty document is a valid, all-defaults configuration
    pub fn from_yaml_str(&self, content: &str) -> ConfigResult<SchedviewConfig> {
        let config = if content.trim().is_empty() {
            SchedviewConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        self.finish(config)
    }

    pub fn from_env(&self) -> ConfigResult<SchedviewConfig> {
        self.finish(SchedviewConfig::default())
    }

    /// File when a path is given, otherwise defaults plus environment
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<SchedviewConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    fn finish(&self, mut config: SchedviewConfig) -> ConfigResult<SchedviewConfig> {
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    fn apply_env_overrides(&self, config: &mut SchedviewConfig) -> ConfigResult<()> {
        if let Some(url) = self.var("ENDPOINT") {
            config.endpoint.url = url;
        }
        if let Some(token) = self.var("AUTH_TOKEN") {
            config.endpoint.auth_token = Some(token);
        }

        let connect_timeout = self.parse_var::<u64>("HTTP_CONNECT_TIMEOUT")?;
        if let Some(seconds) = self.parse_var::<u64>("HTTP_TIMEOUT")? {
            config.http.timeout = Duration::from_secs(seconds);
            // A shorter total timeout also bounds the connect phase
            if connect_timeout.is_none() && config.http.connect_timeout > config.http.timeout {
                config.http.connect_timeout = config.http.timeout;
            }
        }
        if let Some(seconds) = connect_timeout {
            config.http.connect_timeout = Duration::from_secs(seconds);
        }
        if let Some(user_agent) = self.var("HTTP_USER_AGENT") {
            config.http.user_agent = user_agent;
        }
        if let Some(verify) = self.parse_var("HTTP_VERIFY_SSL")? {
            config.http.verify_ssl = verify;
        }

        if let Some(level) = self.parse_var("LOG_LEVEL")? {
            config.logging.level = level;
        }
        if let Some(format) = self.parse_var("LOG_FORMAT")? {
            config.logging.format = format;
        }

        if let Some(format) = self.parse_var("OUTPUT_FORMAT")? {
            config.output.format = format;
        }

        Ok(())
    }

    fn var(&self, name: &str) -> Option<String> {
        std::env::var(format!("{}_{}", self.prefix, name)).ok()
    }

    fn parse_var<T>(&self, name: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.var(name) {
            Some(raw) => {
                debug!("Applying {}_{} override", self.prefix, name);
                raw.trim().parse().map(Some).map_err(|e| {
                    ConfigError::EnvError(format!("Invalid {}_{}='{}': {}", self.prefix, name, raw, e))
                })
            }
            None => Ok(None),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_is_applied() {
        temp_env::with_var("SCHEDVIEW_LOADER_UNIT_ENDPOINT", Some("http://dagit:3000/graphql"), || {
            let config = ConfigLoader::with_prefix("SCHEDVIEW_LOADER_UNIT")
                .from_env()
                .unwrap();
            assert_eq!(config.endpoint.url, "http://dagit:3000/graphql");
        });
    }

    #[test]
    fn test_short_timeout_bounds_connect_timeout() {
        temp_env::with_var("SCHEDVIEW_LOADER_TIMEOUT_HTTP_TIMEOUT", Some("5"), || {
            let config = ConfigLoader::with_prefix("SCHEDVIEW_LOADER_TIMEOUT")
                .from_env()
                .unwrap();
            assert_eq!(config.http.timeout, Duration::from_secs(5));
            assert_eq!(config.http.connect_timeout, Duration::from_secs(5));
        });
    }

    #[test]
    fn test_connect_timeout_override() {
        temp_env::with_vars(
            [
                ("SCHEDVIEW_LOADER_CONNECT_HTTP_TIMEOUT", Some("5")),
                ("SCHEDVIEW_LOADER_CONNECT_HTTP_CONNECT_TIMEOUT", Some("2")),
            ],
            || {
                let config = ConfigLoader::with_prefix("SCHEDVIEW_LOADER_CONNECT")
                    .from_env()
                    .unwrap();
                assert_eq!(config.http.connect_timeout, Duration::from_secs(2));
            },
        );

        temp_env::with_var("SCHEDVIEW_LOADER_CONNECT_HTTP_CONNECT_TIMEOUT", Some("60"), || {
            assert!(ConfigLoader::with_prefix("SCHEDVIEW_LOADER_CONNECT")
                .from_env()
                .is_err());
        });
    }

    #[test]
    fn test_bad_bool_names_the_variable() {
        temp_env::with_var("SCHEDVIEW_LOADER_BOOL_HTTP_VERIFY_SSL", Some("yes"), || {
            let err = ConfigLoader::with_prefix("SCHEDVIEW_LOADER_BOOL")
                .from_env()
                .unwrap_err();
            assert!(err.to_string().contains("SCHEDVIEW_LOADER_BOOL_HTTP_VERIFY_SSL"));
        });
    }
}
