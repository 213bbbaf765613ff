//! Retry envelope applied to every outbound CRM call. Mirrors
//! `http_retry.py`'s `CRM_HTTP_RETRY` decorator: retryable failures are
//! timeouts, network errors, HTTP 429, and any HTTP 5xx; everything else
//! (including parse errors) surfaces immediately. Backoff is exponential
//! with jitter, bounded by `max_attempts`; on exhaustion the last error is
//! returned to the caller unchanged.
//!
//! Cancellation is implicit: dropping the future returned by
//! [`retry_with_backoff`] (e.g. a `tokio::select!` losing branch, or the
//! caller's own timeout) drops everything in flight — the in-progress sleep
//! included — without ever completing a retry attempt. There is no counter
//! to "not count" cancellation against; it simply never runs.

use rand::RngExt as _;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, min_delay_s: f64, max_delay_s: f64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            min_delay: Duration::from_secs_f64(min_delay_s.max(0.0)),
            max_delay: Duration::from_secs_f64(max_delay_s.max(0.0)),
        }
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.min_delay.as_secs_f64() * 2f64.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_secs_f64());
        let jitter = rand::rng().random_range(0.0..=capped.max(self.min_delay.as_secs_f64()));
        Duration::from_secs_f64(jitter.max(0.0))
    }
}

/// Classifies a reqwest-level failure (status already checked separately).
pub fn is_retryable_transport_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect() || error.is_request()
}

pub fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status.as_u16() == 429 || status.is_server_error()
}

/// Runs `operation` up to `policy.max_attempts` times, calling
/// `is_retryable` on each `Err` to decide whether to sleep-and-retry or
/// surface immediately. `label` is for the `before_sleep` log line.
pub async fn retry_with_backoff<F, Fut, T, E>(
    policy: RetryPolicy,
    label: &str,
    is_retryable: impl Fn(&E) -> bool,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                attempt += 1;
                if attempt >= policy.max_attempts || !is_retryable(&error) {
                    return Err(error);
                }
                let delay = policy.delay_for_attempt(attempt);
                warn!(
                    target: "crm.retry",
                    %label,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    "retrying after transient failure"
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, 0.001, 0.002)
    }

    #[tokio::test]
    async fn retries_until_success() {
        let calls = AtomicU32::new(0);
        let result: Result<i32, &str> = retry_with_backoff(
            fast_policy(5),
            "test",
            |_e: &&str| true,
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err("transient")
                    } else {
                        Ok(42)
                    }
                }
            },
        )
        .await;

        assert_eq!(result, Ok(42));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhausts_attempts_then_reraises_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<i32, &str> = retry_with_backoff(
            fast_policy(3),
            "test",
            |_e: &&str| true,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("still failing") }
            },
        )
        .await;

        assert_eq!(result, Err("still failing"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_error_surfaces_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<i32, &str> = retry_with_backoff(
            fast_policy(5),
            "test",
            |_e: &&str| false,
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("bad request") }
            },
        )
        .await;

        assert_eq!(result, Err("bad request"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn status_classification_matches_policy() {
        assert!(is_retryable_status(reqwest::StatusCode::TOO_MANY_REQUESTS));
        assert!(is_retryable_status(reqwest::StatusCode::BAD_GATEWAY));
        assert!(is_retryable_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_retryable_status(reqwest::StatusCode::BAD_REQUEST));
        assert!(!is_retryable_status(reqwest::StatusCode::NOT_FOUND));
        assert!(!is_retryable_status(reqwest::StatusCode::UNAUTHORIZED));
    }
}
