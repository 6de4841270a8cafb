//! HTTP client for page requests
//!
//! A thin reqwest wrapper that handles:
//! - Base URL joining
//! - Default and per-request headers and query parameters
//! - Per-request timeouts
//! - Status classification into crate errors
//!
//! Every request is a single attempt. Retrying a failed page is left to the
//! caller.

use crate::error::{Error, Result};
use crate::types::StringMap;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Client-wide settings
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Prefix for relative request paths
    pub base_url: Option<String>,
    /// Timeout applied when a request sets none
    pub timeout: Duration,
    /// Headers sent with every request
    pub default_headers: StringMap,
    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: Duration::from_secs(30),
            default_headers: StringMap::new(),
            user_agent: format!("pagecache/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Start from the defaults
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for [`HttpClientConfig`]
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Prefix relative paths with `url`
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Default timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Send `key: value` with every request
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Replace the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Per-request settings
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, sent in insertion order
    pub query: Vec<(String, String)>,
    /// Extra headers for this request only
    pub headers: StringMap,
    /// Overrides the client timeout
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a header for this request
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Use `timeout` instead of the client default
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// HTTP client used by page fetchers
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Client with `config`.
    ///
    /// Default headers are validated here, so a bad header name fails
    /// construction rather than every request.
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .default_headers(header_map(&config.default_headers)?)
            .build()?;

        Ok(Self { client, config })
    }

    /// Client settings
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// GET `url`; 4xx and 5xx responses become [`Error::HttpStatus`]
    pub async fn get_with_config(&self, url: &str, request: RequestConfig) -> Result<Response> {
        let full_url = self.resolve(url);
        let timeout = request.timeout.unwrap_or(self.config.timeout);

        let mut builder = self
            .client
            .get(&full_url)
            .headers(header_map(&request.headers)?)
            .timeout(timeout);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let response = send(builder, timeout).await?;
        debug!(url = %full_url, status = response.status().as_u16(), "GET");
        Ok(response)
    }

    /// GET `url` and deserialize the JSON body
    pub async fn get_json_with_config<T: DeserializeOwned>(
        &self,
        url: &str,
        request: RequestConfig,
    ) -> Result<T> {
        self.get_with_config(url, request)
            .await?
            .json()
            .await
            .map_err(|e| Error::decode(format!("Failed to parse response body: {e}")))
    }

    /// Absolute URLs pass through; anything else is joined onto the base URL
    fn resolve(&self, path: &str) -> String {
        let absolute = path.starts_with("http://") || path.starts_with("https://");
        match &self.config.base_url {
            Some(base) if !absolute => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            _ => path.to_string(),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

async fn send(builder: RequestBuilder, timeout: Duration) -> Result<Response> {
    let response = builder.send().await.map_err(|e| {
        if e.is_timeout() {
            Error::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }
        } else {
            Error::Http(e)
        }
    })?;

    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::http_status(status.as_u16(), body));
    }
    Ok(response)
}

fn header_map(headers: &StringMap) -> Result<HeaderMap> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (key, value) in headers {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| Error::invalid_value("headers", format!("'{key}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| Error::invalid_value("headers", format!("'{key}': {e}")))?;
        map.insert(name, value);
    }
    Ok(map)
}
