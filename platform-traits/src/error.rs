//! Error taxonomy for remote platform and asset-source operations
//!
//! Providers convert raw HTTP failures into `PlatformError` at the boundary,
//! so retry decisions are made from typed variants rather than by inspecting
//! response shapes at every call site.

use thiserror::Error;

/// Errors produced by remote platform and asset-source calls
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Connection-level failure (reset, timeout, broken pipe)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP response
    #[error("Remote API error (status {status}): {message}")]
    Http { status: u16, message: String },

    /// HTTP 403 carrying the platform's rate-limit-exceeded reason code
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Authentication or token acquisition failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Response body could not be parsed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Remote object not found
    #[error("Not found: {0}")]
    NotFound(String),
}

impl PlatformError {
    /// Classify a non-success HTTP response into the taxonomy.
    ///
    /// This is the single place that inspects the platform's error body: a
    /// 403 whose first error reason is `rateLimitExceeded` becomes
    /// [`PlatformError::RateLimited`]; everything else keeps its status and
    /// the server's message text.
    pub fn from_status_body(status: u16, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();

        if status == 403 {
            let reason = parsed
                .as_ref()
                .and_then(|v| v["error"]["errors"][0]["reason"].as_str());
            if reason == Some("rateLimitExceeded") {
                return Self::RateLimited;
            }
        }

        let message = parsed
            .as_ref()
            .and_then(|v| v["error"]["message"].as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.trim().to_string());
        Self::Http { status, message }
    }

    /// Whether a retry with backoff is worthwhile.
    ///
    /// Retryable: transport failures, HTTP 500/503, and rate-limit 403s.
    /// Everything else surfaces immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http { status, .. } => matches!(status, 500 | 503),
            Self::RateLimited => true,
            _ => false,
        }
    }
}

/// Result type for platform operations
pub type Result<T> = std::result::Result<T, PlatformError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors_are_retryable() {
        assert!(PlatformError::Transport("connection reset".to_string()).is_retryable());
    }

    #[test]
    fn test_server_errors_are_retryable() {
        for status in [500, 503] {
            let err = PlatformError::Http {
                status,
                message: "server error".to_string(),
            };
            assert!(err.is_retryable(), "status {} should be retryable", status);
        }
    }

    #[test]
    fn test_rate_limit_is_retryable() {
        assert!(PlatformError::RateLimited.is_retryable());
    }

    #[test]
    fn test_client_errors_are_not_retryable() {
        for status in [400, 401, 403, 404, 409] {
            let err = PlatformError::Http {
                status,
                message: "client error".to_string(),
            };
            assert!(
                !err.is_retryable(),
                "status {} should not be retryable",
                status
            );
        }
    }

    #[test]
    fn test_auth_and_parse_errors_are_not_retryable() {
        assert!(!PlatformError::Auth("expired".to_string()).is_retryable());
        assert!(!PlatformError::InvalidResponse("bad json".to_string()).is_retryable());
        assert!(!PlatformError::NotFound("file.mp4".to_string()).is_retryable());
    }

    #[test]
    fn test_classify_rate_limited_403() {
        let body = r#"{"error":{"code":403,"message":"Rate limit exceeded","errors":[{"reason":"rateLimitExceeded","domain":"youtube.quota"}]}}"#;
        let err = PlatformError::from_status_body(403, body);
        assert!(matches!(err, PlatformError::RateLimited));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_classify_plain_403_is_fatal() {
        let body = r#"{"error":{"code":403,"message":"Forbidden","errors":[{"reason":"insufficientPermissions"}]}}"#;
        let err = PlatformError::from_status_body(403, body);
        assert!(matches!(err, PlatformError::Http { status: 403, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_classify_extracts_server_message() {
        let body = r#"{"error":{"code":500,"message":"Backend Error"}}"#;
        match PlatformError::from_status_body(500, body) {
            PlatformError::Http { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Backend Error");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_classify_non_json_body() {
        match PlatformError::from_status_body(502, "<html>Bad Gateway</html>") {
            PlatformError::Http { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "<html>Bad Gateway</html>");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_error_display() {
        let err = PlatformError::Http {
            status: 404,
            message: "Video not found".to_string(),
        };
        assert_eq!(err.to_string(), "Remote API error (status 404): Video not found");
    }
}
