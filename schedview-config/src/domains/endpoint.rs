//! GraphQL endpoint configuration

use crate::error::ConfigResult;
use crate::validation::{validate_header_name, validate_http_url, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Local development server
const DEFAULT_URL: &str = "http://127.0.0.1:3000/graphql";

/// Where the GraphQL server lives and how to authenticate against it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// GraphQL endpoint URL, http or https
    pub url: String,

    /// Bearer token sent in the Authorization header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    /// Extra headers sent with every request
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            auth_token: None,
            headers: BTreeMap::new(),
        }
    }
}

impl Validatable for EndpointConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_http_url(&self.url, "url", self.domain_name())?;

        if self.auth_token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(self.validation_error("auth_token cannot be blank when set"));
        }

        for name in self.headers.keys() {
            validate_header_name(name, self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "endpoint"
    }
}
