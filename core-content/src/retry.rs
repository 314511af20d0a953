//! Attempt loop shared by every remote fetch.

use bridge_traits::RetryPolicy;
use std::future::Future;
use tracing::{debug, warn};

/// Run `operation` until it succeeds or `policy.max_attempts` attempts have
/// failed, sleeping `policy.delay_after(attempt)` between attempts.
///
/// The error of the final attempt is returned unchanged.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match operation().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(label, attempt, "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(e) if attempt < max_attempts => {
                let delay = policy.delay_after(attempt);
                warn!(
                    label,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Fetch failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                warn!(label, attempt, error = %e, "Fetch failed, giving up");
                return Err(e);
            }
        }
    }
}
