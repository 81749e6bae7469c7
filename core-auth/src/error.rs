use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    #[error("Token storage error: {0}")]
    Storage(String),

    #[error("Not authenticated; run the auth flow first")]
    NotAuthenticated,
}

pub type Result<T> = std::result::Result<T, AuthError>;
