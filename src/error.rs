//! Error types for reply-desk
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for reply-desk
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Backend Response Errors
    // ============================================================================
    /// The backend rejected the bearer token (HTTP 401)
    #[error("Unauthorized")]
    Unauthorized,

    /// Any other non-success response
    #[error("API error: {status} {body}")]
    Api { status: u16, body: String },

    /// A success response whose body was not the expected JSON shape
    #[error("Failed to decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    /// The backend could not be reached at all
    #[error("Cannot connect to API at {base_url}. Make sure the backend is running.")]
    BackendUnreachable { base_url: String },

    /// Any other network-layer failure, passed through untouched
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Credential Errors
    // ============================================================================
    #[error("Token store error: {message}")]
    TokenStore { message: String },

    #[error("Malformed token: {message}")]
    MalformedToken { message: String },

    // ============================================================================
    // Server Errors
    // ============================================================================
    #[error("Server error: {message}")]
    Server { message: String },

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an API status error
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a token store error
    pub fn token_store(message: impl Into<String>) -> Self {
        Self::TokenStore {
            message: message.into(),
        }
    }

    /// Create a malformed token error
    pub fn malformed_token(message: impl Into<String>) -> Self {
        Self::MalformedToken {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a server error
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    /// Whether this error means the session is no longer valid
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Unauthorized)
    }

    /// HTTP status carried by the error, if it came from a backend response
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized => Some(401),
            Error::Api { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for reply-desk
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::Unauthorized.to_string(), "Unauthorized");

        let err = Error::api(404, "Draft not found");
        assert_eq!(err.to_string(), "API error: 404 Draft not found");

        let err = Error::BackendUnreachable {
            base_url: "http://localhost:8000".to_string(),
        };
        assert!(err.to_string().contains("http://localhost:8000"));

        let err = Error::config("bad url");
        assert_eq!(err.to_string(), "Configuration error: bad url");
    }

    #[test]
    fn test_status() {
        assert_eq!(Error::Unauthorized.status(), Some(401));
        assert_eq!(Error::api(500, "").status(), Some(500));
        assert_eq!(Error::config("x").status(), None);
    }

    #[test]
    fn test_is_unauthorized() {
        assert!(Error::Unauthorized.is_unauthorized());
        assert!(!Error::api(403, "forbidden").is_unauthorized());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::token_store("disk full"));
        let with_context = result.context("saving session");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("saving session: Token store error: disk full"));
    }
}
