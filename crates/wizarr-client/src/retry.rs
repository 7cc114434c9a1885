//! Bounded exponential backoff for invitation calls.

use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{WizarrError, WizarrResult};

fn default_retry_status_codes() -> Vec<u16> {
    vec![429, 500, 502, 503, 504]
}

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 = no retries).
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds. Doubles per retry.
    pub base_delay_ms: u64,
    /// Upper bound for any single delay, in milliseconds.
    pub max_delay_ms: u64,
    /// Statuses treated as transient.
    pub retry_status_codes: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 30_000,
            retry_status_codes: default_retry_status_codes(),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given retry budget and base delay.
    #[must_use]
    pub fn new(max_retries: u32, base_delay_ms: u64) -> Self {
        Self {
            max_retries,
            base_delay_ms,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_max_delay(mut self, ms: u64) -> Self {
        self.max_delay_ms = ms;
        self
    }

    /// Whether `error` is transient under this policy.
    ///
    /// Status-bearing errors are matched against `retry_status_codes`;
    /// otherwise only timeouts and connection failures qualify.
    #[must_use]
    pub fn is_transient(&self, error: &WizarrError) -> bool {
        match error.status() {
            Some(status) => self.retry_status_codes.contains(&status),
            None => matches!(
                error,
                WizarrError::Timeout(_) | WizarrError::Unreachable(_)
            ),
        }
    }

    /// Whether the call should be attempted again after `attempt` (0-based)
    /// failed with `error`.
    #[must_use]
    pub fn should_retry(&self, attempt: u32, error: &WizarrError) -> bool {
        attempt < self.max_retries && self.is_transient(error)
    }

    /// Delay before retry number `attempt` (0-based).
    ///
    /// `min(base * 2^attempt, max)`, or the server's `Retry-After` when a 429
    /// carried one. Never zero.
    #[must_use]
    pub fn delay_for(&self, attempt: u32, error: &WizarrError) -> Duration {
        let ms = if let WizarrError::RateLimited {
            retry_after_secs: Some(secs),
        } = error
        {
            secs.saturating_mul(1000).min(self.max_delay_ms)
        } else {
            self.base_delay_ms
                .saturating_mul(2u64.saturating_pow(attempt))
                .min(self.max_delay_ms)
        };
        Duration::from_millis(ms.max(1))
    }

    /// Run `f` until it succeeds, fails permanently, or the retry budget runs
    /// out.
    pub async fn execute<F, Fut, T>(&self, operation_name: &str, mut f: F) -> WizarrResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = WizarrResult<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match f().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(
                            operation = operation_name,
                            attempt = attempt + 1,
                            "Operation succeeded after retries"
                        );
                    }
                    return Ok(value);
                }
                Err(error) => {
                    if !self.should_retry(attempt, &error) {
                        if attempt > 0 && self.is_transient(&error) {
                            warn!(
                                operation = operation_name,
                                attempts = attempt + 1,
                                error = %error,
                                "Max retries exceeded"
                            );
                            return Err(WizarrError::MaxRetriesExceeded {
                                attempts: attempt + 1,
                                message: format!(
                                    "{error} (gave up after {} attempts)",
                                    attempt + 1
                                ),
                            });
                        }
                        return Err(error);
                    }

                    let delay = self.delay_for(attempt, &error);
                    warn!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        max_retries = self.max_retries,
                        wait_ms = delay.as_millis() as u64,
                        error = %error,
                        "Transient error, retrying with backoff"
                    );

                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn http(status: u16) -> WizarrError {
        WizarrError::Http {
            status,
            detail: "test".into(),
        }
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.base_delay_ms, 1000);
        assert_eq!(policy.retry_status_codes, vec![429, 500, 502, 503, 504]);
    }

    #[test]
    fn test_should_retry_transient_statuses() {
        let policy = RetryPolicy::new(3, 1);
        assert!(policy.should_retry(0, &http(503)));
        assert!(policy.should_retry(2, &http(500)));
        assert!(!policy.should_retry(3, &http(500))); // budget spent
        assert!(policy.should_retry(
            0,
            &WizarrError::RateLimited {
                retry_after_secs: None
            }
        ));
    }

    #[test]
    fn test_should_not_retry_client_errors() {
        let policy = RetryPolicy::new(3, 1);
        assert!(!policy.should_retry(0, &http(400)));
        assert!(!policy.should_retry(0, &http(401)));
        assert!(!policy.should_retry(0, &http(404)));
        assert!(!policy.should_retry(0, &WizarrError::ParseError("x".into())));
    }

    #[test]
    fn test_transport_signals_are_transient() {
        let policy = RetryPolicy::default();
        assert!(policy.is_transient(&WizarrError::Timeout("slow".into())));
        assert!(policy.is_transient(&WizarrError::Unreachable("refused".into())));
        assert!(!policy.is_transient(&WizarrError::Request("bad".into())));
    }

    #[test]
    fn test_default_transient_statuses() {
        let policy = RetryPolicy::default();
        for status in [429, 500, 502, 503, 504] {
            assert!(policy.is_transient(&http(status)), "{status} should be transient");
        }
        assert!(policy.is_transient(&WizarrError::RateLimited {
            retry_after_secs: None
        }));
    }

    #[test]
    fn test_permanent_errors_are_not_transient() {
        let policy = RetryPolicy::default();
        for status in [400, 401, 403, 404, 409, 422, 501] {
            assert!(!policy.is_transient(&http(status)), "{status} should be permanent");
        }
        assert!(!policy.is_transient(&WizarrError::InvalidConfig("x".into())));
        assert!(!policy.is_transient(&WizarrError::ParseError("x".into())));
    }

    #[test]
    fn test_custom_status_set() {
        let mut policy = RetryPolicy::default();
        policy.retry_status_codes = vec![503];
        assert!(policy.is_transient(&http(503)));
        assert!(!policy.is_transient(&http(500)));
    }

    #[test]
    fn test_delay_exponential_backoff() {
        let policy = RetryPolicy::new(5, 100);
        let error = http(502);

        assert_eq!(policy.delay_for(0, &error), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1, &error), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2, &error), Duration::from_millis(400));
        assert_eq!(policy.delay_for(3, &error), Duration::from_millis(800));
    }

    #[test]
    fn test_delay_capped_at_max() {
        let policy = RetryPolicy::new(10, 1000).with_max_delay(5000);
        let error = http(503);

        assert_eq!(policy.delay_for(5, &error), Duration::from_millis(5000));
        assert_eq!(policy.delay_for(40, &error), Duration::from_millis(5000));
    }

    #[test]
    fn test_delay_never_zero() {
        let policy = RetryPolicy::new(3, 0);
        assert_eq!(policy.delay_for(0, &http(500)), Duration::from_millis(1));

        let limited = WizarrError::RateLimited {
            retry_after_secs: Some(0),
        };
        assert_eq!(policy.delay_for(0, &limited), Duration::from_millis(1));
    }

    #[test]
    fn test_delay_honours_retry_after() {
        let policy = RetryPolicy::new(3, 10);
        let limited = WizarrError::RateLimited {
            retry_after_secs: Some(2),
        };
        assert_eq!(policy.delay_for(0, &limited), Duration::from_secs(2));

        let capped = RetryPolicy::new(3, 10).with_max_delay(500);
        assert_eq!(capped.delay_for(0, &limited), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_execute_succeeds_first_try() {
        let policy = RetryPolicy::new(3, 1);
        let result = policy
            .execute("test_op", || async { Ok::<_, WizarrError>(42) })
            .await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_execute_succeeds_after_retries() {
        let policy = RetryPolicy::new(3, 1);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result = policy
            .execute("test_op", move || {
                let counter = counter_clone.clone();
                async move {
                    if counter.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(http(503))
                    } else {
                        Ok(99)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 99);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_execute_permanent_error_fails_immediately() {
        let policy = RetryPolicy::new(3, 1);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: WizarrResult<()> = policy
            .execute("test_op", move || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(http(400))
                }
            })
            .await;

        assert!(matches!(result, Err(WizarrError::Http { status: 400, .. })));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_execute_max_retries_exceeded() {
        let policy = RetryPolicy::new(2, 1);
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let result: WizarrResult<()> = policy
            .execute("test_op", move || {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(http(502))
                }
            })
            .await;

        match result {
            Err(WizarrError::MaxRetriesExceeded { attempts, message }) => {
                assert_eq!(attempts, 3);
                assert!(message.contains("HTTP 502"));
            }
            other => panic!("Expected MaxRetriesExceeded, got: {other:?}"),
        }
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_zero_retries_returns_transient_error_as_is() {
        let policy = RetryPolicy::new(0, 1);
        let result: WizarrResult<()> = policy
            .execute("test_op", || async { Err(http(503)) })
            .await;
        assert!(matches!(result, Err(WizarrError::Http { status: 503, .. })));
    }
}
