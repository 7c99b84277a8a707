//! Credential context passed along with every request

use super::store::{MemoryTokenStore, TokenStore};
use crate::error::{Error, Result};
use std::sync::Arc;

/// Explicit handle on the session token used to authenticate requests.
///
/// Cloning is cheap and clones share the same store. An anonymous context
/// has no store at all: lookups yield no token and clearing is a no-op.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    store: Option<Arc<dyn TokenStore>>,
}

impl Credentials {
    /// Context without any token storage
    pub fn anonymous() -> Self {
        Self { store: None }
    }

    /// Context backed by the given store
    pub fn new(store: impl TokenStore + 'static) -> Self {
        Self {
            store: Some(Arc::new(store)),
        }
    }

    /// In-memory context holding a fixed token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(MemoryTokenStore::with_token(token))
    }

    /// Whether this context has no store
    pub fn is_anonymous(&self) -> bool {
        self.store.is_none()
    }

    /// Token to send, if any. An empty stored value counts as no token.
    pub async fn token(&self) -> Result<Option<String>> {
        match &self.store {
            Some(store) => Ok(store.load().await?.filter(|t| !t.is_empty())),
            None => Ok(None),
        }
    }

    /// Persist a newly issued token
    pub async fn store_token(&self, token: &str) -> Result<()> {
        match &self.store {
            Some(store) => store.save(token).await,
            None => Err(Error::token_store(
                "cannot store a token in an anonymous credential context",
            )),
        }
    }

    /// Forget the current token
    pub async fn clear(&self) -> Result<()> {
        match &self.store {
            Some(store) => store.clear().await,
            None => Ok(()),
        }
    }
}
