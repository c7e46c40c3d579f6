//! Retry utility for handling transient errors in async operations
//!
//! Provides configurable retry policies with backoff and an optional
//! predicate so callers can decide which errors are worth retrying.

use std::time::Duration;
use tokio::time::sleep;

/// Configurable retry policy for async operations
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after each failed attempt
    pub backoff_factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(500),
            backoff_factor: 2,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries, for callers that want a single attempt
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            backoff_factor: 1,
        }
    }
}

/// Execute an async operation, retrying every failure under the policy
///
/// # Examples
/// ```rust
/// use repoaudit::core::retry::{retry_async, RetryPolicy};
///
/// # async fn example() -> Result<String, String> {
/// let result = retry_async("fetch_listing", RetryPolicy::default(), || async {
///     Ok::<String, String>("success".to_string())
/// })
/// .await?;
/// # Ok(result)
/// # }
/// ```
pub async fn retry_async<F, T, E, Fut>(
    operation_name: &str,
    policy: RetryPolicy,
    operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    retry_async_where(operation_name, policy, operation, |_| true).await
}

/// Execute an async operation, retrying only errors the predicate accepts
///
/// Errors rejected by `retryable` are returned immediately without
/// consuming further attempts.
pub async fn retry_async_where<F, T, E, Fut, P>(
    operation_name: &str,
    policy: RetryPolicy,
    mut operation: F,
    retryable: P,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    P: Fn(&E) -> bool,
{
    let mut delay = policy.initial_delay;
    let mut last_error = None;

    for attempt in 0..policy.max_attempts {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(error) => {
                if !retryable(&error) {
                    return Err(error);
                }
                last_error = Some(error);
                if attempt < policy.max_attempts - 1 {
                    log::debug!(
                        "Operation '{}' failed on attempt {}/{}, retrying in {:?}: {}",
                        operation_name,
                        attempt + 1,
                        policy.max_attempts,
                        delay,
                        last_error.as_ref().unwrap()
                    );
                    sleep(delay).await;
                    delay = delay.saturating_mul(policy.backoff_factor);
                }
            }
        }
    }

    Err(last_error.unwrap())
}
