//! Client configuration
//!
//! The backend base URL is resolved once per process from
//! `REPLY_DESK_API_URL`, falling back to the local development backend.
//! Everything else can be overridden through a YAML file or the builder.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Environment variable overriding the backend base URL
pub const API_URL_ENV: &str = "REPLY_DESK_API_URL";

/// Environment variable overriding the token file location
pub const TOKEN_FILE_ENV: &str = "REPLY_DESK_TOKEN_FILE";

/// Backend used when no override is present
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Page the user is sent to when the session is rejected
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Base URL resolved at first use and fixed for the rest of the process
pub static API_BASE_URL: LazyLock<String> =
    LazyLock::new(|| resolve_base_url(std::env::var(API_URL_ENV).ok()));

/// Pick the override when it is non-empty, otherwise the default
pub fn resolve_base_url(env_value: Option<String>) -> String {
    env_value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
        .trim_end_matches('/')
        .to_string()
}

fn default_base_url() -> String {
    API_BASE_URL.clone()
}

fn default_token_path() -> PathBuf {
    std::env::var(TOKEN_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(".reply-desk").join("token.json"))
}

fn default_login_path() -> String {
    DEFAULT_LOGIN_PATH.to_string()
}

fn default_user_agent() -> String {
    format!("reply-desk/{}", env!("CARGO_PKG_VERSION"))
}

/// Configuration for the API client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Where the bearer token is persisted
    #[serde(default = "default_token_path")]
    pub token_path: PathBuf,

    /// Navigation target after a rejected session
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token_path: default_token_path(),
            login_path: default_login_path(),
            user_agent: default_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Configuration taken from the process environment
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config: Self = serde_yaml::from_str(yaml)?;
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_yaml_str(&contents)
    }

    /// Check that the base URL is usable
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }
        if !self.login_path.starts_with('/') {
            return Err(Error::config("login_path must start with '/'"));
        }
        Ok(())
    }
}

/// Builder for client config
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the token file path
    pub fn token_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.token_path = path.into();
        self
    }

    /// Set the login page path
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.config.login_path = path.into();
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
