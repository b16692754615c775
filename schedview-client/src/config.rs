//! Client configuration

use schedview_config::domains::http::ProxyConfig;
use schedview_config::SchedviewConfig;
use std::collections::BTreeMap;
use std::time::Duration;

/// Settings used to build an [`HttpScheduleClient`](crate::HttpScheduleClient)
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,

    /// Bearer token sent in the Authorization header
    pub auth_token: Option<String>,

    /// Extra request headers
    pub headers: BTreeMap<String, String>,

    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum number of redirects to follow
    pub max_redirects: u32,

    /// User agent string
    pub user_agent: String,

    /// Whether to verify TLS certificates
    pub verify_ssl: bool,

    pub proxy: Option<ProxyConfig>,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from(&SchedviewConfig::default())
    }
}

impl From<&SchedviewConfig> for ClientConfig {
    fn from(config: &SchedviewConfig) -> Self {
        Self {
            endpoint: config.endpoint.url.clone(),
            auth_token: config.endpoint.auth_token.clone(),
            headers: config.endpoint.headers.clone(),
            timeout: config.http.timeout,
            connect_timeout: config.http.connect_timeout,
            max_redirects: config.http.max_redirects,
            user_agent: config.http.user_agent.clone(),
            verify_ssl: config.http.verify_ssl,
            proxy: config.http.proxy.clone(),
        }
    }
}
