//! Named backend operations
//!
//! Each method is a fixed method/path/body over [`HttpClient::request`].
//! A 401 from any of them runs the configured `UnauthorizedHandler`
//! before the error is returned.

use super::types::{
    AuthCallback, AuthStart, Draft, DraftApproved, DraftSent, DraftUpdated, Email, EmailDetail,
    FetchOne, FetchUnread, GenerateDraftRequest, GeneratedDraft, UpdateDraftRequest,
};
use crate::auth::{
    Credentials, FileTokenStore, LogNavigator, ResetSession, UnauthorizedHandler,
};
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Client for the reply-drafting backend
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    credentials: Credentials,
    on_unauthorized: Option<Arc<dyn UnauthorizedHandler>>,
}

impl ApiClient {
    /// Create a client that resets the session through the log on 401
    pub fn new(http: HttpClient, credentials: Credentials) -> Self {
        Self {
            http,
            credentials,
            on_unauthorized: Some(Arc::new(ResetSession::default())),
        }
    }

    /// Build a client from configuration, with the token kept on disk
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let http = HttpClient::with_config(config)?;
        let store = FileTokenStore::open(&config.token_path)?;
        let handler = ResetSession::new(LogNavigator).login_path(config.login_path.clone());

        Ok(Self::new(http, Credentials::new(store)).with_unauthorized_handler(handler))
    }

    /// Replace the 401 handler
    #[must_use]
    pub fn with_unauthorized_handler(mut self, handler: impl UnauthorizedHandler + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(handler));
        self
    }

    /// Return 401s to the caller without any side effect
    #[must_use]
    pub fn without_unauthorized_handler(mut self) -> Self {
        self.on_unauthorized = None;
        self
    }

    /// Same client, different credential context
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }

    /// Credential context used for every call
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Underlying HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<T> {
        let result = self
            .http
            .request(method, endpoint, config, &self.credentials)
            .await;

        if matches!(result, Err(Error::Unauthorized)) {
            if let Some(handler) = &self.on_unauthorized {
                handler.on_unauthorized(&self.credentials).await;
            }
        }
        result
    }

    // ========================================================================
    // Auth
    // ========================================================================

    /// Begin the Google OAuth flow
    pub async fn start_google_auth(&self) -> Result<AuthStart> {
        self.call(Method::GET, "/auth/google/start", RequestConfig::new())
            .await
    }

    /// Exchange the OAuth callback parameters for a session token
    pub async fn google_callback(&self, code: &str, state: &str) -> Result<AuthCallback> {
        let config = RequestConfig::new()
            .query("code", code)
            .query("state", state);
        self.call(Method::GET, "/auth/google/callback", config).await
    }

    // ========================================================================
    // Emails
    // ========================================================================

    pub async fn list_emails(&self) -> Result<Vec<Email>> {
        self.call(Method::GET, "/emails", RequestConfig::new()).await
    }

    pub async fn get_email(&self, id: i64) -> Result<EmailDetail> {
        self.call(Method::GET, &format!("/emails/{id}"), RequestConfig::new())
            .await
    }

    /// Ask the backend to ingest every unread message
    pub async fn fetch_unread(&self) -> Result<FetchUnread> {
        self.call(Method::POST, "/internal/fetch-unread", RequestConfig::new())
            .await
    }

    /// Ask the backend to ingest one message by its Gmail id
    pub async fn fetch_email(&self, gmail_id: &str) -> Result<FetchOne> {
        self.call(
            Method::POST,
            &format!("/internal/fetch/{gmail_id}"),
            RequestConfig::new(),
        )
        .await
    }

    // ========================================================================
    // Drafts
    // ========================================================================

    pub async fn list_drafts(&self) -> Result<Vec<Draft>> {
        self.call(Method::GET, "/drafts", RequestConfig::new()).await
    }

    /// Generate a reply draft for an email, optionally in a given tone
    pub async fn generate_draft(&self, email_id: i64, tone: Option<&str>) -> Result<GeneratedDraft> {
        let body = GenerateDraftRequest {
            email_id,
            tone: tone.map(str::to_string),
        };
        let config = RequestConfig::new().json(&body)?;
        self.call(Method::POST, "/drafts/generate", config).await
    }

    pub async fn get_draft(&self, id: i64) -> Result<Draft> {
        self.call(Method::GET, &format!("/drafts/{id}"), RequestConfig::new())
            .await
    }

    /// Replace a draft's content
    pub async fn update_draft(&self, id: i64, content: &str) -> Result<DraftUpdated> {
        let body = UpdateDraftRequest {
            content: content.to_string(),
        };
        let config = RequestConfig::new().json(&body)?;
        self.call(Method::PATCH, &format!("/drafts/{id}"), config)
            .await
    }

    pub async fn approve_draft(&self, id: i64) -> Result<DraftApproved> {
        self.call(
            Method::POST,
            &format!("/drafts/{id}/approve"),
            RequestConfig::new(),
        )
        .await
    }

    /// Send an approved draft as a reply in its thread
    pub async fn send_draft(&self, id: i64) -> Result<DraftSent> {
        self.call(
            Method::POST,
            &format!("/drafts/{id}/send"),
            RequestConfig::new(),
        )
        .await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("http", &self.http)
            .field("credentials", &self.credentials)
            .field("has_unauthorized_handler", &self.on_unauthorized.is_some())
            .finish()
    }
}
