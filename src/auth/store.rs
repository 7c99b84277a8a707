//! Token persistence
//!
//! A token store holds at most one opaque bearer token. The file store
//! keeps it in a small JSON document so a session survives between runs.

use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::warn;

/// Name of the slot the token is stored under
pub const TOKEN_KEY: &str = "jwt_token";

/// Storage for the session's bearer token
#[async_trait]
pub trait TokenStore: Send + Sync + std::fmt::Debug {
    /// Current token, if any
    async fn load(&self) -> Result<Option<String>>;

    /// Replace the stored token
    async fn save(&self, token: &str) -> Result<()>;

    /// Remove the stored token
    async fn clear(&self) -> Result<()>;
}

/// In-process token store
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &str) -> Result<()> {
        *self.token.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// On-disk layout of the token file
#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    #[serde(rename = "jwt_token")]
    token: String,
}

/// File-backed token store with atomic writes
#[derive(Debug)]
pub struct FileTokenStore {
    /// Path to the token file
    path: PathBuf,
    /// Cached token, kept in step with the file
    cached: RwLock<Option<String>>,
}

impl FileTokenStore {
    /// Open a store, reading the existing token if the file is present.
    ///
    /// A file that does not parse holds no token; the next `save` or
    /// `clear` replaces it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let cached = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::token_store(format!("Failed to read token file: {e}")))?;
            match serde_json::from_str::<TokenFile>(&contents) {
                Ok(file) => Some(file.token),
                Err(e) => {
                    warn!(
                        "Ignoring unreadable token file {}: {e}",
                        path.display()
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            path,
            cached: RwLock::new(cached),
        })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self.cached.read().await.clone())
    }

    async fn save(&self, token: &str) -> Result<()> {
        let mut cached = self.cached.write().await;

        let contents = serde_json::to_string_pretty(&TokenFile {
            token: token.to_string(),
        })
        .map_err(|e| Error::token_store(format!("Failed to serialize token: {e}")))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::token_store(format!("Failed to create token dir: {e}")))?;
        }

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::token_store(format!("Failed to write token file: {e}")))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::token_store(format!("Failed to rename token file: {e}")))?;

        *cached = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut cached = self.cached.write().await;

        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(Error::token_store(format!(
                    "Failed to remove token file: {e}"
                )))
            }
        }

        *cached = None;
        Ok(())
    }
}
