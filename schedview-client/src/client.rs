//! Schedule query clients

use crate::config::ClientConfig;
use crate::errors::{ClientError, ClientResult};
use crate::query::{schedule_root_request, ScheduleRootOperation};
use crate::types::{decode_response, into_result, GraphQLQuery, GraphQLResponse, QueryBody};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION},
    redirect, Client, NoProxy, Proxy, Url,
};
use schedview_types::{ScheduleRootQuery, ScheduleSelector};
use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Longest response body kept in a status error
const MAX_ERROR_BODY: usize = 512;

/// Source of `ScheduleRootQuery` results
#[async_trait::async_trait]
pub trait ScheduleClient: Send + Sync {
    async fn fetch_schedule_root(
        &self,
        selector: &ScheduleSelector,
    ) -> ClientResult<ScheduleRootQuery>;
}

/// Client that POSTs the query to a GraphQL endpoint
#[derive(Debug, Clone)]
pub struct HttpScheduleClient {
    client: Client,
    endpoint: Url,
}

impl HttpScheduleClient {
    /// Build a client; the underlying connection pool is shared by clones
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let endpoint = Url::parse(&config.endpoint).map_err(|e| {
            ClientError::ConfigError(format!("Invalid endpoint '{}': {}", config.endpoint, e))
        })?;

        debug!(
            "Creating schedule client for {} with timeout: {}s",
            endpoint,
            config.timeout.as_secs()
        );

        let mut builder = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_ssl)
            .redirect(redirect::Policy::limited(config.max_redirects as usize))
            .default_headers(default_headers(config)?);

        if let Some(proxy) = &config.proxy {
            debug!("Using proxy {}", proxy.url);
            let no_proxy = proxy
                .no_proxy_list()
                .and_then(|hosts| NoProxy::from_string(&hosts));
            builder = builder.proxy(Proxy::all(proxy.url.as_str())?.no_proxy(no_proxy));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Execute any GraphQL operation and decode its data
    pub async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> ClientResult<Q::ResponseData> {
        let body = self.post(&Q::build_query(variables)).await?;
        let envelope: GraphQLResponse<Q::ResponseData> = serde_json::from_str(&body)?;
        into_result(envelope)
    }

    /// Fetch the undecoded response envelope, e.g. to save it for replay
    pub async fn fetch_raw(&self, selector: &ScheduleSelector) -> ClientResult<JsonValue> {
        let body = self.post(&schedule_root_request(selector)).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn post<V: Serialize>(&self, request: &QueryBody<V>) -> ClientResult<String> {
        info!("Sending {} to {}", request.operation_name, self.endpoint);

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        info!(
            "GraphQL response received: {} ({} bytes)",
            status.as_u16(),
            body.len()
        );

        if !status.is_success() {
            // Servers report validation failures as 4xx with an error envelope
            if let Ok(envelope) = serde_json::from_str::<GraphQLResponse<JsonValue>>(&body) {
                if let Some(errors) = envelope.errors.filter(|errors| !errors.is_empty()) {
                    return Err(ClientError::GraphQL(errors));
                }
            }
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        Ok(body)
    }
}

#[async_trait::async_trait]
impl ScheduleClient for HttpScheduleClient {
    async fn fetch_schedule_root(
        &self,
        selector: &ScheduleSelector,
    ) -> ClientResult<ScheduleRootQuery> {
        debug!("Fetching schedule {}", selector);
        self.execute::<ScheduleRootOperation>(selector.clone().into_variables())
            .await
    }
}

fn default_headers(config: &ClientConfig) -> ClientResult<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    for (key, value) in &config.headers {
        let name = HeaderName::from_str(key)
            .map_err(|_| ClientError::InvalidHeader(key.clone()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ClientError::InvalidHeader(format!("value of {}", key)))?;
        headers.insert(name, value);
    }
    if !config.headers.is_empty() {
        debug!("Adding {} custom headers", config.headers.len());
    }

    if let Some(token) = &config.auth_token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ClientError::InvalidHeader("Authorization".to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    Ok(headers)
}

/// Client that answers from canned responses
#[derive(Debug, Clone, Default)]
pub struct OfflineScheduleClient {
    mocks: HashMap<ScheduleSelector, JsonValue>,
    fallback: Option<JsonValue>,
}

impl OfflineScheduleClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for one selector, either an envelope or bare data
    pub fn add_mock(&mut self, selector: ScheduleSelector, response: JsonValue) {
        debug!("Added schedule mock for {}", selector);
        self.mocks.insert(selector, response);
    }

    /// Response returned for any selector without its own mock
    pub fn set_fallback(&mut self, response: JsonValue) {
        self.fallback = Some(response);
    }

    /// Serve a saved response file for every selector
    pub fn from_recording(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        debug!("Loading recorded response from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        let mut client = Self::new();
        client.set_fallback(serde_json::from_str(&content)?);
        Ok(client)
    }

    pub fn clear_mocks(&mut self) {
        self.mocks.clear();
        self.fallback = None;
    }
}

#[async_trait::async_trait]
impl ScheduleClient for OfflineScheduleClient {
    async fn fetch_schedule_root(
        &self,
        selector: &ScheduleSelector,
    ) -> ClientResult<ScheduleRootQuery> {
        let response = self
            .mocks
            .get(selector)
            .or(self.fallback.as_ref())
            .ok_or_else(|| ClientError::NoMock(selector.to_string()))?;

        debug!("Serving mock response for {}", selector);
        decode_response(response.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn not_found_response() -> JsonValue {
        json!({
            "scheduler": {"__typename": "Scheduler", "schedulerClass": null},
            "scheduleDefinitionOrError": {
                "__typename": "ScheduleDefinitionNotFoundError",
                "message": "not found"
            }
        })
    }

    #[test]
    fn test_invalid_endpoint_is_config_error() {
        let config = ClientConfig::new("not a url");
        assert!(matches!(
            HttpScheduleClient::new(&config),
            Err(ClientError::ConfigError(_))
        ));
    }

    #[test]
    fn test_endpoint_is_parsed_once() {
        let client =
            HttpScheduleClient::new(&ClientConfig::new("http://dagit:3000/graphql")).unwrap();
        assert_eq!(client.endpoint().host_str(), Some("dagit"));
        assert_eq!(client.endpoint().path(), "/graphql");
    }

    #[test]
    fn test_invalid_header_name_is_rejected() {
        let mut headers = BTreeMap::new();
        headers.insert("bad header".to_string(), "x".to_string());
        let config = ClientConfig {
            headers,
            ..ClientConfig::default()
        };
        assert!(matches!(
            default_headers(&config),
            Err(ClientError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_bearer_token_header() {
        let config = ClientConfig {
            auth_token: Some("abc".to_string()),
            ..ClientConfig::default()
        };
        let headers = default_headers(&config).unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc");
        assert!(headers.get(AUTHORIZATION).unwrap().is_sensitive());
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
    }

    #[tokio::test]
    async fn test_offline_client_serves_mock() {
        let selector = ScheduleSelector::new("repo1", "repo", "my_schedule");
        let mut client = OfflineScheduleClient::new();
        client.add_mock(selector.clone(), json!({ "data": not_found_response() }));

        let result = client.fetch_schedule_root(&selector).await.unwrap();
        assert!(result.schedule_definition_or_error.definition().is_err());
        assert!(result.scheduler.is_configured());
    }

    #[tokio::test]
    async fn test_offline_client_without_mock() {
        let mut client = OfflineScheduleClient::new();
        client.add_mock(
            ScheduleSelector::new("repo1", "repo", "my_schedule"),
            not_found_response(),
        );

        let other = ScheduleSelector::new("repo1", "repo", "other");
        match client.fetch_schedule_root(&other).await {
            Err(ClientError::NoMock(name)) => assert_eq!(name, "other@repo@repo1"),
            result => panic!("unexpected result: {:?}", result),
        }

        client.set_fallback(not_found_response());
        assert!(client.fetch_schedule_root(&other).await.is_ok());

        client.clear_mocks();
        assert!(client.fetch_schedule_root(&other).await.is_err());
    }
}
