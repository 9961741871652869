//! HTTP caller
//!
//! Issues exactly one request per call and classifies the outcome:
//! - 2xx responses are returned as [`RawResponse`]
//! - anything else becomes [`Error::Api`] carrying the status and body
//!
//! Each call emits one log record. No retries.

use super::params::RequestParams;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// A successful (2xx) response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body text
    pub body: String,
}

impl RawResponse {
    /// Create a response from its parts
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body)
            .map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))
    }

    /// The optional top-level `message` field of a JSON body
    pub fn message(&self) -> Option<String> {
        let value: Value = serde_json::from_str(&self.body).ok()?;
        match value.get("message")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Issues a single HTTP request
#[async_trait]
pub trait HttpCaller: Send + Sync {
    /// Send one request to `url`; non-2xx statuses fail with [`Error::Api`]
    async fn call(&self, url: &str, params: &RequestParams) -> Result<RawResponse>;
}

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("fivetran-toolkit/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiClientConfig {
    /// Create a new config builder
    pub fn builder() -> ApiClientConfigBuilder {
        ApiClientConfigBuilder::default()
    }
}

/// Builder for API client config
#[derive(Default)]
pub struct ApiClientConfigBuilder {
    config: ApiClientConfig,
}

impl ApiClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ApiClientConfig {
        self.config
    }
}

/// `reqwest`-backed [`HttpCaller`]
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    config: ApiClientConfig,
}

impl ApiClient {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ApiClientConfig::default())
    }

    /// Create a client with custom configuration
    pub fn with_config(config: ApiClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }
}

#[async_trait]
impl HttpCaller for ApiClient {
    async fn call(&self, url: &str, params: &RequestParams) -> Result<RawResponse> {
        let mut req = self.client.request(params.method.into(), url);

        for (key, value) in &params.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(ref body) = params.body {
            req = req.body(body.clone());
        }

        let response = req.send().await.map_err(|e| {
            warn!("RequestError: {} {url}: {e}", params.method);
            e
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            warn!("RequestError: Response Code={status}, {} {url}: {e}", params.method);
            e
        })?;

        if !(200..300).contains(&status) {
            warn!("ResponseError: Response Code={status}, {} {url}", params.method);
            return Err(Error::api(status, body));
        }

        let response = RawResponse::new(status, body);
        let note = response
            .message()
            .unwrap_or_else(|| "HTTP request success".to_string());
        if params.muted {
            debug!("ResponseSuccess: Response Code={status}, {note}");
        } else {
            info!("ResponseSuccess: Response Code={status}, {note}");
        }

        Ok(response)
    }
}
