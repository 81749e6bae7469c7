//! Auth manager
//!
//! Hands out a valid bearer token to the provider clients, refreshing and
//! re-persisting it when it is inside the expiry buffer. Providers hold an
//! `Arc<AuthManager>` injected at construction.

use crate::error::{AuthError, Result};
use crate::oauth::OAuthFlow;
use crate::token_store::TokenFileStore;
use crate::types::OAuthTokens;
use tokio::sync::Mutex;
use tracing::{debug, info};

pub struct AuthManager {
    flow: OAuthFlow,
    store: TokenFileStore,
    tokens: Mutex<Option<OAuthTokens>>,
}

impl AuthManager {
    /// Load any stored tokens and wrap them with the flow and store
    pub async fn load(flow: OAuthFlow, store: TokenFileStore) -> Result<Self> {
        let tokens = store.load().await?;
        if tokens.is_some() {
            debug!("Using existing tokens");
        }
        Ok(Self {
            flow,
            store,
            tokens: Mutex::new(tokens),
        })
    }

    pub fn flow(&self) -> &OAuthFlow {
        &self.flow
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.lock().await.is_some()
    }

    /// Complete the one-time consent flow: exchange the code and persist
    pub async fn complete_authorization(&self, code: &str) -> Result<()> {
        let exchanged = self.flow.exchange_code(code).await?;
        self.store.save(&exchanged).await?;
        *self.tokens.lock().await = Some(exchanged);
        info!("Authentication complete");
        Ok(())
    }

    /// A currently valid access token, refreshing (and persisting the
    /// rotated set) when the held one is expired or about to expire.
    pub async fn access_token(&self) -> Result<String> {
        let mut guard = self.tokens.lock().await;
        let tokens = guard.as_ref().ok_or(AuthError::NotAuthenticated)?;

        if !tokens.is_expired() {
            return Ok(tokens.access_token.clone());
        }

        debug!("Access token expired, refreshing");
        let refreshed = self.flow.refresh(tokens).await?;
        self.store.save(&refreshed).await?;
        let access_token = refreshed.access_token.clone();
        *guard = Some(refreshed);
        Ok(access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oauth::OAuthConfig;
    use chrono::{Duration, Utc};

    fn flow() -> OAuthFlow {
        OAuthFlow::new(
            OAuthConfig::google("id".to_string(), "secret".to_string(), "uri".to_string()),
            reqwest::Client::new(),
        )
    }

    #[tokio::test]
    async fn test_unauthenticated_manager_refuses_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenFileStore::new(dir.path().join("tokens.json"));
        let manager = AuthManager::load(flow(), store).await.unwrap();

        assert!(!manager.is_authenticated().await);
        assert!(matches!(
            manager.access_token().await,
            Err(AuthError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_fresh_token_is_returned_without_refresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenFileStore::new(dir.path().join("tokens.json"));
        store
            .save(&OAuthTokens {
                access_token: "fresh".to_string(),
                refresh_token: Some("r".to_string()),
                expires_at: Utc::now() + Duration::hours(1),
            })
            .await
            .unwrap();

        let manager = AuthManager::load(flow(), store).await.unwrap();
        assert!(manager.is_authenticated().await);
        assert_eq!(manager.access_token().await.unwrap(), "fresh");
    }
}
