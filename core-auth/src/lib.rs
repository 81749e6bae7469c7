//! # OAuth 2.0 Credentials
//!
//! Authorization-code flow and token lifecycle for the platform account.
//!
//! ## Overview
//!
//! The pipeline needs one authenticated account with upload, playlist, and
//! read-only storage scopes. This crate handles:
//!
//! - Building the authorization URL for the one-time consent flow
//! - Exchanging the authorization code for tokens
//! - Refreshing access tokens before they expire (with a safety buffer)
//! - Persisting tokens in a local JSON document so later runs skip the flow
//!
//! Token values are never logged; `OAuthTokens` redacts them in `Debug`.

pub mod error;
pub mod manager;
pub mod oauth;
pub mod token_store;
pub mod types;

pub use error::{AuthError, Result};
pub use manager::AuthManager;
pub use oauth::{OAuthConfig, OAuthFlow};
pub use token_store::TokenFileStore;
pub use types::OAuthTokens;
