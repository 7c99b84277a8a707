//! # reply-desk
//!
//! Typed client for the reply-drafting mail backend, plus the route gate
//! that sits in front of its web UI.
//!
//! ## Features
//!
//! - **Typed Endpoints**: Google sign-in, email listing and ingestion, draft lifecycle
//! - **Explicit Credentials**: The bearer token travels in a `Credentials` context,
//!   kept in memory or in a token file
//! - **Error Classification**: 401, other API errors, unreachable backend, transport
//! - **Session Reset**: Pluggable handler clears the token and sends the user to `/login`
//! - **Route Gate**: axum middleware classifying UI navigations
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use reply_desk::{ApiClient, ClientConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let api = ApiClient::from_config(&ClientConfig::from_env())?;
//!
//!     for email in api.list_emails().await? {
//!         println!("{} {:?}", email.id, email.subject);
//!     }
//!
//!     let draft = api.generate_draft(42, Some("friendly")).await?;
//!     api.approve_draft(draft.draft_id).await?;
//!     api.send_draft(draft.draft_id).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 ApiClient (named operations)             │
//! │   auth · emails · drafts        401 → UnauthorizedHandler│
//! └────────────────────────────┬─────────────────────────────┘
//!                              │
//! ┌──────────────┬─────────────┴──────────┬──────────────────┐
//! │    Auth      │        HTTP            │      Gate        │
//! ├──────────────┼────────────────────────┼──────────────────┤
//! │ Credentials  │ Bearer + JSON headers  │ RouteMatcher     │
//! │ TokenStore   │ classify()             │ GateDecision     │
//! │ ResetSession │ BackendUnreachable     │ axum middleware  │
//! └──────────────┴────────────────────────┴──────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::unused_self)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Client configuration
pub mod config;

/// Credentials, token storage and session reset
pub mod auth;

/// Authenticated request wrapper
pub mod http;

/// Typed backend operations
pub mod api;

/// Route gate for UI navigations
pub mod gate;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use api::{ApiClient, Draft, Email, EmailDetail};
pub use auth::{Credentials, FileTokenStore, MemoryTokenStore, TokenStore};
pub use config::ClientConfig;
pub use error::{Error, Result};
pub use gate::{GateDecision, RouteGate};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
