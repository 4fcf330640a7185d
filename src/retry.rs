use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use http::StatusCode;
use log::debug;
use reqwest::Response;

use crate::error::Result;

/// Retry policy keyed on HTTP status codes and transport errors.
///
/// The defaults retry throttling and transient server failures (429, 500,
/// 502, 503, 504) up to 3 times with exponential backoff starting at one
/// second.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Number of retries after the initial attempt.
    retries: u32,
    /// Base delay in seconds; the delay before retry `n` is
    /// `backoff * 2^(n-1)`.
    backoff: f64,
    /// Status codes that trigger a retry.
    status_codes: HashSet<StatusCode>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 3,
            backoff: 1.0,
            status_codes: HashSet::from([
                StatusCode::TOO_MANY_REQUESTS,
                StatusCode::INTERNAL_SERVER_ERROR,
                StatusCode::BAD_GATEWAY,
                StatusCode::SERVICE_UNAVAILABLE,
                StatusCode::GATEWAY_TIMEOUT,
            ]),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default retries, backoff, and status codes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of retries. `0` means a single attempt, whatever its
    /// outcome.
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the base backoff delay in seconds.
    pub fn with_backoff(mut self, backoff: f64) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replace the set of status codes that trigger a retry.
    pub fn with_status_codes(mut self, status_codes: impl IntoIterator<Item = StatusCode>) -> Self {
        self.status_codes = status_codes.into_iter().collect();
        self
    }

    fn is_retryable(&self, status: StatusCode) -> bool {
        self.status_codes.contains(&status)
    }

    fn delay(&self, attempt: u32) -> Duration {
        let secs = self.backoff.max(0.0) * 2f64.powi(attempt as i32);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

/// Run `call` under `policy`, retrying on retryable status codes and
/// transport errors.
///
/// The total number of attempts is `retries + 1`. A response whose status is
/// not in the policy's set returns immediately, success or not. A response
/// with a retryable status is retried while attempts remain and returned
/// as-is once they run out. A transport error is retried the same way and
/// returned as the error of the final attempt once attempts run out; every
/// other error kind propagates immediately, untouched.
///
/// ```no_run
/// # async fn example() -> awshttp::Result<()> {
/// use awshttp::{with_retry, RequestOptions, RetryPolicy};
///
/// let policy = RetryPolicy::new().with_retries(5).with_backoff(0.5);
/// let response = with_retry(&policy, || {
///     awshttp::get("https://api.example.com/v1/status", RequestOptions::new())
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn with_retry<F, Fut>(policy: &RetryPolicy, mut call: F) -> Result<Response>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Response>>,
{
    let mut attempt = 0;
    loop {
        match call().await {
            Ok(response) if !policy.is_retryable(response.status()) => return Ok(response),
            Ok(response) => {
                if attempt >= policy.retries {
                    return Ok(response);
                }
                debug!(
                    "retrying after status {} (attempt {} of {})",
                    response.status(),
                    attempt + 1,
                    policy.retries
                );
            }
            Err(err) => {
                if !err.is_transport_error() || attempt >= policy.retries {
                    return Err(err);
                }
                debug!(
                    "retrying after transport error: {err} (attempt {} of {})",
                    attempt + 1,
                    policy.retries
                );
            }
        }

        tokio::time::sleep(policy.delay(attempt)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::time::Instant;

    fn response_with(status: u16) -> Response {
        Response::from(
            http::Response::builder()
                .status(status)
                .body("")
                .expect("response must be valid"),
        )
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy::new().with_backoff(0.0)
    }

    #[tokio::test]
    async fn test_retryable_status_exhausts_and_returns_last_response() {
        let _ = env_logger::builder().is_test(true).try_init();

        for retries in [0, 1, 3] {
            let policy = fast_policy().with_retries(retries);
            let mut calls = 0;
            let response = with_retry(&policy, || {
                calls += 1;
                async { Ok(response_with(503)) }
            })
            .await
            .expect("exhaustion must return the response, not an error");

            assert_eq!(calls, retries + 1);
            assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        }
    }

    #[tokio::test]
    async fn test_transport_error_exhausts_and_returns_last_error() {
        for retries in [0, 2] {
            let policy = fast_policy().with_retries(retries);
            let mut calls = 0;
            let err = with_retry(&policy, || {
                calls += 1;
                async { Err(Error::transport("connection refused")) }
            })
            .await
            .expect_err("exhaustion must propagate the error");

            assert_eq!(calls, retries + 1);
            assert!(err.is_transport_error());
        }
    }

    #[tokio::test]
    async fn test_non_retryable_status_returns_immediately() {
        let policy = fast_policy().with_retries(3);
        let mut calls = 0;
        let response = with_retry(&policy, || {
            calls += 1;
            async { Ok(response_with(404)) }
        })
        .await
        .expect("must succeed");

        assert_eq!(calls, 1);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_transport_error_is_never_retried() {
        let policy = fast_policy().with_retries(3);
        let mut calls = 0;
        let err = with_retry(&policy, || {
            calls += 1;
            async { Err(Error::credential_invalid("no usable credentials")) }
        })
        .await
        .expect_err("must propagate");

        assert_eq!(calls, 1);
        assert!(err.is_credential_error());
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failures() {
        let policy = fast_policy().with_retries(3);
        let mut calls = 0;
        let response = with_retry(&policy, || {
            calls += 1;
            let status = if calls < 3 { 500 } else { 200 };
            async move { Ok(response_with(status)) }
        })
        .await
        .expect("must succeed");

        assert_eq!(calls, 3);
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_custom_status_codes() {
        let policy = fast_policy()
            .with_retries(2)
            .with_status_codes([StatusCode::NOT_FOUND]);
        let mut calls = 0;
        let response = with_retry(&policy, || {
            calls += 1;
            async { Ok(response_with(404)) }
        })
        .await
        .expect("must succeed");

        assert_eq!(calls, 3);
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        // 500 is no longer in the set, so it returns on the first attempt.
        let mut calls = 0;
        let response = with_retry(&policy, || {
            calls += 1;
            async { Ok(response_with(500)) }
        })
        .await
        .expect("must succeed");

        assert_eq!(calls, 1);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_delay_doubles_per_attempt() {
        let policy = RetryPolicy::new().with_backoff(1.0);
        assert_eq!(policy.delay(0), Duration::from_secs(1));
        assert_eq!(policy.delay(1), Duration::from_secs(2));
        assert_eq!(policy.delay(2), Duration::from_secs(4));

        let policy = RetryPolicy::new().with_backoff(0.5);
        assert_eq!(policy.delay(0), Duration::from_secs_f64(0.5));
        assert_eq!(policy.delay(1), Duration::from_secs(1));
        assert_eq!(policy.delay(2), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_backoff_is_applied_between_attempts() {
        // 0.02 + 0.04 seconds of delay across two retries.
        let policy = RetryPolicy::new().with_retries(2).with_backoff(0.02);
        let started = Instant::now();
        let _ = with_retry(&policy, || async { Ok(response_with(500)) }).await;
        assert!(started.elapsed() >= Duration::from_secs_f64(0.06));
    }
}
