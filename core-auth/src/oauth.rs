//! OAuth 2.0 authorization-code flow
//!
//! Builds the consent URL, exchanges the authorization code, and refreshes
//! access tokens against the provider's token endpoint.

use crate::error::{AuthError, Result};
use crate::types::OAuthTokens;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

/// OAuth 2.0 provider configuration
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// OAuth client ID
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Redirect URI for the authorization callback
    pub redirect_uri: String,
    /// Scopes to request
    pub scopes: Vec<String>,
    /// Authorization endpoint URL
    pub auth_url: String,
    /// Token endpoint URL
    pub token_url: String,
}

impl OAuthConfig {
    /// Configuration for the Google endpoints with the scopes the pipeline
    /// needs: video upload, playlist management, and read-only file storage.
    pub fn google(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            scopes: vec![
                "https://www.googleapis.com/auth/youtube.upload".to_string(),
                "https://www.googleapis.com/auth/youtube".to_string(),
                "https://www.googleapis.com/auth/drive.readonly".to_string(),
            ],
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
        }
    }
}

/// Wire format of the token endpoint response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    expires_in: i64,
}

/// Stateless flow operations against the token endpoint
pub struct OAuthFlow {
    config: OAuthConfig,
    http: reqwest::Client,
}

impl OAuthFlow {
    pub fn new(config: OAuthConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Build the authorization URL the user must visit once.
    ///
    /// `access_type=offline` with a forced consent prompt is what makes the
    /// server return a refresh token.
    pub fn authorize_url(&self) -> Result<String> {
        let mut url = Url::parse(&self.config.auth_url)
            .map_err(|e| AuthError::AuthenticationFailed(format!("bad auth URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.config.scopes.join(" "))
            .append_pair("access_type", "offline")
            .append_pair("prompt", "select_account consent");
        Ok(url.into())
    }

    /// Exchange an authorization code for a token set
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthTokens> {
        debug!("Exchanging authorization code for tokens");
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
            ("redirect_uri", &self.config.redirect_uri),
        ];
        let response = self
            .request_tokens(&params)
            .await
            .map_err(AuthError::TokenExchangeFailed)?;

        info!(
            has_refresh_token = response.refresh_token.is_some(),
            "Authorization code exchanged"
        );
        Ok(OAuthTokens::new(
            response.access_token,
            response.refresh_token,
            response.expires_in,
        ))
    }

    /// Refresh an access token.
    ///
    /// The server usually omits the refresh token from refresh responses;
    /// the previous one is preserved so it is never lost in rotation.
    pub async fn refresh(&self, tokens: &OAuthTokens) -> Result<OAuthTokens> {
        let refresh_token = tokens
            .refresh_token
            .as_deref()
            .ok_or_else(|| AuthError::TokenRefreshFailed("no refresh token held".to_string()))?;

        debug!("Refreshing access token");
        let params = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", &self.config.client_id),
            ("client_secret", &self.config.client_secret),
        ];
        let response = self
            .request_tokens(&params)
            .await
            .map_err(AuthError::TokenRefreshFailed)?;

        let refreshed = OAuthTokens::new(
            response.access_token,
            response
                .refresh_token
                .or_else(|| tokens.refresh_token.clone()),
            response.expires_in,
        );
        info!(expires_at = %refreshed.expires_at, "Access token refreshed");
        Ok(refreshed)
    }

    async fn request_tokens(
        &self,
        params: &[(&str, &str)],
    ) -> std::result::Result<TokenResponse, String> {
        let response = self
            .http
            .post(&self.config.token_url)
            .form(params)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("token endpoint returned {}: {}", status, body));
        }

        response
            .json::<TokenResponse>()
            .await
            .map_err(|e| format!("bad token response: {}", e))
    }
}
