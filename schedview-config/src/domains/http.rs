//! HTTP transport settings for talking to the GraphQL endpoint

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_REDIRECTS: u32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request timeout, in seconds
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub timeout: Duration,

    /// TCP/TLS connect timeout, in seconds; never longer than `timeout`
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub connect_timeout: Duration,

    pub max_redirects: u32,

    pub user_agent: String,

    /// Set to false to accept self-signed certificates
    pub verify_ssl: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

/// Proxy used for requests to the endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProxyConfig {
    pub url: String,

    /// Hosts reached directly, e.g. `localhost` or `.internal`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub no_proxy: Vec<String>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: concat!("schedview/", env!("CARGO_PKG_VERSION")).to_string(),
            verify_ssl: true,
            proxy: None,
        }
    }
}

impl ProxyConfig {
    /// `no_proxy` in the comma-separated form proxies expect
    pub fn no_proxy_list(&self) -> Option<String> {
        if self.no_proxy.is_empty() {
            None
        } else {
            Some(self.no_proxy.join(","))
        }
    }
}

impl Validatable for HttpConfig {
    fn validate(&self) -> ConfigResult<()> {
        let domain = self.domain_name();
        validate_positive(self.timeout.as_secs(), "timeout", domain)?;
        validate_positive(self.connect_timeout.as_secs(), "connect_timeout", domain)?;
        if self.connect_timeout > self.timeout {
            return Err(self.validation_error(format!(
                "connect_timeout ({}s) is longer than timeout ({}s)",
                self.connect_timeout.as_secs(),
                self.timeout.as_secs()
            )));
        }
        validate_required_string(&self.user_agent, "user_agent", domain)?;

        match &self.proxy {
            Some(proxy) => proxy.validate(),
            None => Ok(()),
        }
    }

    fn domain_name(&self) -> &'static str {
        "http"
    }
}

impl Validatable for ProxyConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.url, "url", self.domain_name())?;
        if self.no_proxy.iter().any(|host| host.trim().is_empty()) {
            return Err(self.validation_error("no_proxy contains an empty host"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "http.proxy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.max_redirects, 10);
        assert!(config.user_agent.starts_with("schedview/"));
        assert!(config.verify_ssl);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let config: HttpConfig = serde_yaml::from_str("timeout: 60\nverify_ssl: false").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert!(!config.verify_ssl);
    }

    #[test]
    fn test_timeouts_are_checked() {
        let config = HttpConfig {
            timeout: Duration::ZERO,
            ..HttpConfig::default()
        };
        assert!(config.validate().is_err());

        let config = HttpConfig {
            timeout: Duration::from_secs(5),
            ..HttpConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("connect_timeout (10s)"));

        let config = HttpConfig {
            user_agent: String::new(),
            ..HttpConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_proxy() {
        let mut proxy = ProxyConfig {
            url: "http://proxy.example.com:8080".to_string(),
            no_proxy: vec!["localhost".to_string(), ".internal".to_string()],
        };
        assert!(proxy.validate().is_ok());
        assert_eq!(proxy.no_proxy_list().as_deref(), Some("localhost,.internal"));

        proxy.no_proxy.push(" ".to_string());
        assert!(proxy.validate().is_err());

        proxy.no_proxy.clear();
        proxy.url = "not-a-url".to_string();
        assert!(proxy.validate().is_err());
        assert!(proxy.no_proxy_list().is_none());
    }
}
