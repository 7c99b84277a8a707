//! Authentication module
//!
//! Holds the session token and decides what to do when the backend
//! rejects it.
//!
//! - `Credentials` is the explicit context handed to each request
//! - `TokenStore` implementations keep the token in memory or on disk
//! - `UnauthorizedHandler` runs after a 401 (by default `ResetSession`)

mod claims;
mod credentials;
mod session;
mod store;

pub use claims::TokenClaims;
pub use credentials::Credentials;
pub use session::{LogNavigator, Navigator, RecordingNavigator, ResetSession, UnauthorizedHandler};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
