//! Reacting to a rejected session
//!
//! Request classification only reports `Error::Unauthorized`. What happens
//! next (dropping the token, sending the user back to the login page) is
//! decided here, by whoever owns the client.

use super::credentials::Credentials;
use crate::config::DEFAULT_LOGIN_PATH;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Sends the user somewhere else in the application
pub trait Navigator: Send + Sync {
    /// Navigate to the given application path
    fn navigate(&self, path: &str);
}

/// Navigator for headless contexts: tells the user where to go via the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        warn!(target: "reply_desk::session", "Session expired, sign in again at {path}");
    }
}

/// Navigator that remembers every path it was asked to open
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths navigated to so far, oldest first
    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .map(|v| v.clone())
            .unwrap_or_default()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        if let Ok(mut visited) = self.visited.lock() {
            visited.push(path.to_string());
        }
    }
}

impl<N: Navigator + ?Sized> Navigator for Arc<N> {
    fn navigate(&self, path: &str) {
        (**self).navigate(path);
    }
}

/// Effect run after a request was rejected with 401
#[async_trait]
pub trait UnauthorizedHandler: Send + Sync {
    /// Called once per rejected request, before the error reaches the caller
    async fn on_unauthorized(&self, credentials: &Credentials);
}

/// Default handler: clear the token and navigate to the login page
pub struct ResetSession {
    login_path: String,
    navigator: Arc<dyn Navigator>,
}

impl ResetSession {
    /// Reset to `/login` through the given navigator
    pub fn new(navigator: impl Navigator + 'static) -> Self {
        Self {
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            navigator: Arc::new(navigator),
        }
    }

    /// Use a different login path
    #[must_use]
    pub fn login_path(mut self, path: impl Into<String>) -> Self {
        self.login_path = path.into();
        self
    }
}

impl Default for ResetSession {
    fn default() -> Self {
        Self::new(LogNavigator)
    }
}

impl std::fmt::Debug for ResetSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResetSession")
            .field("login_path", &self.login_path)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UnauthorizedHandler for ResetSession {
    async fn on_unauthorized(&self, credentials: &Credentials) {
        if let Err(e) = credentials.clear().await {
            warn!("Failed to clear rejected token: {e}");
        }
        self.navigator.navigate(&self.login_path);
    }
}
