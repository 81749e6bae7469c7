use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// OAuth 2.0 token set.
///
/// The refresh token is optional because the authorization server only
/// returns one on the first consent; rotations must preserve the original.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthTokens {
    /// The access token used for API requests
    pub access_token: String,
    /// The refresh token used to obtain new access tokens
    pub refresh_token: Option<String>,
    /// When the access token expires (UTC)
    pub expires_at: DateTime<Utc>,
}

impl OAuthTokens {
    /// Create a token set expiring `expires_in` seconds from now
    pub fn new(access_token: String, refresh_token: Option<String>, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at: Utc::now() + Duration::seconds(expires_in),
        }
    }

    /// Whether the access token is expired or inside the refresh buffer.
    ///
    /// The 5-minute buffer refreshes tokens before they actually expire, so
    /// a long-running upload never starts with a token about to die.
    pub fn is_expired(&self) -> bool {
        self.is_expired_with_buffer(300)
    }

    /// [`is_expired`](Self::is_expired) with an explicit buffer
    pub fn is_expired_with_buffer(&self, buffer_seconds: i64) -> bool {
        Utc::now() >= self.expires_at - Duration::seconds(buffer_seconds)
    }
}

// Token values never appear in logs
impl fmt::Debug for OAuthTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthTokens")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_token_is_not_expired() {
        let tokens = OAuthTokens::new("a".to_string(), Some("r".to_string()), 3600);
        assert!(!tokens.is_expired());
    }

    #[test]
    fn test_token_inside_buffer_is_expired() {
        let tokens = OAuthTokens::new("a".to_string(), None, 200);
        assert!(tokens.is_expired());
        assert!(!tokens.is_expired_with_buffer(60));
    }

    #[test]
    fn test_past_expiry_is_expired() {
        let tokens = OAuthTokens {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_at: Utc::now() - Duration::hours(1),
        };
        assert!(tokens.is_expired());
    }

    #[test]
    fn test_debug_redacts_token_values() {
        let tokens = OAuthTokens::new(
            "secret_access".to_string(),
            Some("secret_refresh".to_string()),
            3600,
        );
        let debug = format!("{:?}", tokens);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("secret_access"));
        assert!(!debug.contains("secret_refresh"));
    }

    #[test]
    fn test_serialization_round_trip() {
        let tokens = OAuthTokens::new("a".to_string(), Some("r".to_string()), 3600);
        let json = serde_json::to_string(&tokens).unwrap();
        let back: OAuthTokens = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tokens);
    }
}
