//! Retry executor
//!
//! Wraps every remote platform call with bounded retries and a fixed
//! backoff schedule. Retryability is decided by the typed error produced at
//! the provider boundary — this is the only place that consults it.

use platform_traits::PlatformError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Maximum attempts per operation (the first try counts)
pub const MAX_ATTEMPTS: u32 = 3;

/// Backoff before retry N+1, indexed by how many attempts have failed
pub const RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(5),
    Duration::from_secs(30),
    Duration::from_secs(120),
];

/// Run `operation`, retrying transient failures.
///
/// `operation` must produce a fresh future per attempt — streamed requests
/// restart from the beginning. Non-retryable errors, and the final
/// attempt's failure, propagate immediately.
pub async fn with_retry<T, F, Fut>(mut operation: F, context: &str) -> Result<T, PlatformError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PlatformError>>,
{
    let mut failed_attempts: u32 = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                failed_attempts += 1;
                if !error.is_retryable() || failed_attempts >= MAX_ATTEMPTS {
                    return Err(error);
                }

                let delay = RETRY_DELAYS[(failed_attempts - 1) as usize];
                warn!(
                    attempt = failed_attempts,
                    max_retries = MAX_ATTEMPTS,
                    context,
                    delay_secs = delay.as_secs(),
                    error = %error,
                    "Retrying after error"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
