//! Authenticated request wrapper
//!
//! Every backend call goes through [`HttpClient::request`]:
//! - JSON content type on every request, bearer token when one is stored
//! - Status classification into `Unauthorized` / `Api`
//! - Connection failures reported against the configured base URL
//!
//! Each call is a single attempt. There are no retries and no timeouts.

use crate::auth::Credentials;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, in order
    pub query: Vec<(String, String)>,
    /// Extra request headers
    pub headers: Vec<(String, String)>,
    /// Request body, already serialized as JSON
    pub body: Option<String>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set a pre-serialized JSON body
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize a value as the JSON body
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self> {
        Ok(self.body(serde_json::to_string(body)?))
    }
}

/// Classify a response status.
///
/// Success statuses pass, 401 becomes `Unauthorized` regardless of the body,
/// and anything else becomes `Api` carrying the status and body unchanged.
pub fn classify(status: u16, body: impl Into<String>) -> Result<()> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(classify_failure(status, body))
    }
}

/// Error for a status already known to be unsuccessful
pub fn classify_failure(status: u16, body: impl Into<String>) -> Error {
    match status {
        401 => Error::Unauthorized,
        _ => Error::api(status, body),
    }
}

/// HTTP client bound to one backend
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
}

impl HttpClient {
    /// Create a client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_config(&ClientConfig::builder().base_url(base_url).build())
    }

    /// Create a client from a full configuration
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Transport)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL every endpoint is appended to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint path
    pub fn build_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Headers for a request: JSON content type, extras, then the bearer token
    fn build_headers(&self, extra: &[(String, String)], token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        for (key, value) in extra {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|e| Error::config(format!("Invalid header name '{key}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::config(format!("Invalid value for header '{key}': {e}")))?;
            headers.insert(name, value);
        }

        if let Some(token) = token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| Error::config(format!("Invalid bearer token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Make a request and decode the JSON response
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        config: RequestConfig,
        credentials: &Credentials,
    ) -> Result<T> {
        let token = credentials.token().await?;
        let url = self.build_url(endpoint);
        let headers = self.build_headers(&config.headers, token.as_deref())?;

        let mut req = self.client.request(method.clone(), &url).headers(headers);
        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        if let Some(body) = config.body {
            req = req.body(body);
        }

        let response = match req.send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() => {
                error!("Network error, is the backend running? {e}");
                return Err(Error::BackendUnreachable {
                    base_url: self.base_url.clone(),
                });
            }
            Err(e) => {
                error!("Request to {url} failed: {e}");
                return Err(Error::Transport(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(text) => text,
                Err(_) => reason_phrase(status),
            };
            error!("API Error [{}]: {}", status.as_u16(), body);
            return Err(classify_failure(status.as_u16(), body));
        }

        debug!("Request succeeded: {} {}", method, url);
        let bytes = response.bytes().await.map_err(Error::Transport)?;
        serde_json::from_slice(&bytes).map_err(|e| Error::decode(endpoint, e.to_string()))
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}
