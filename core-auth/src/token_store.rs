//! Token persistence
//!
//! Tokens live in one local JSON document next to the pipeline state, so a
//! later run reuses the stored refresh token instead of repeating the
//! consent flow. Single-user CLI: a plain file, not a platform keychain.

use crate::error::{AuthError, Result};
use crate::types::OAuthTokens;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct TokenFileStore {
    path: PathBuf,
}

impl TokenFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load stored tokens; absent or unreadable documents read as none
    pub async fn load(&self) -> Result<Option<OAuthTokens>> {
        let data = match tokio::fs::read(&self.path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AuthError::Storage(e.to_string())),
        };

        match serde_json::from_slice(&data) {
            Ok(tokens) => Ok(Some(tokens)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Stored tokens unreadable, treating as absent"
                );
                Ok(None)
            }
        }
    }

    /// Persist tokens, replacing any previous set
    pub async fn save(&self, tokens: &OAuthTokens) -> Result<()> {
        let json = serde_json::to_vec_pretty(tokens)
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        info!(path = %self.path.display(), "Tokens saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenFileStore::new(dir.path().join("tokens.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenFileStore::new(dir.path().join("tokens.json"));

        let tokens = OAuthTokens::new("access".to_string(), Some("refresh".to_string()), 3600);
        store.save(&tokens).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded, tokens);
    }

    #[tokio::test]
    async fn test_corrupt_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.json");
        std::fs::write(&path, b"not json").unwrap();

        let store = TokenFileStore::new(&path);
        assert!(store.load().await.unwrap().is_none());
    }
}
