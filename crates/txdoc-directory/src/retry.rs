//! Retry policy for organization directory lookups.
//!
//! A lookup is retried when the request never produced a response
//! (connect failure, timeout) or when the directory answered with a gateway
//! status (502, 503, 504) that it emits while restarting behind its proxy.
//! Every other response, 500 included, goes back to the caller on the first
//! try.

use std::time::Duration;

use reqwest::StatusCode;

/// How often, and how patiently, a directory lookup is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one.
    pub max_retries: u32,
    /// Delay before the first retry. Doubles on each further retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_millis(200),
        }
    }
}

impl RetryPolicy {
    /// A policy that sends each request once.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (0-based).
    pub fn delay(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(1u32.checked_shl(retry).unwrap_or(u32::MAX))
    }

    /// Whether the directory is expected to recover from this status.
    pub fn is_transient(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT
        )
    }

    /// Send the request built by `request` until it yields a non-transient
    /// outcome or the retries run out. The last outcome is returned as is.
    pub(crate) async fn send<F>(
        &self,
        organization: &str,
        request: F,
    ) -> Result<reqwest::Response, reqwest::Error>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut retry = 0;
        loop {
            let outcome = request().send().await;
            if retry >= self.max_retries {
                return outcome;
            }
            let reason = match &outcome {
                Ok(resp) if Self::is_transient(resp.status()) => resp.status().to_string(),
                Ok(_) => return outcome,
                Err(e) => e.to_string(),
            };

            let delay = self.delay(retry);
            retry += 1;
            tracing::warn!(
                organization_id = organization,
                retry,
                max_retries = self.max_retries,
                delay_ms = delay.as_millis() as u64,
                %reason,
                "organization lookup will be retried"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_delays_are_200_400_800() {
        let policy = RetryPolicy::default();
        let delays: Vec<_> = (0..policy.max_retries).map(|r| policy.delay(r)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(200),
                Duration::from_millis(400),
                Duration::from_millis(800)
            ]
        );
    }

    #[test]
    fn delay_saturates_instead_of_overflowing() {
        let policy = RetryPolicy {
            max_retries: 64,
            base_delay: Duration::from_secs(1),
        };
        assert!(policy.delay(40) >= policy.delay(10));
    }

    #[test]
    fn only_gateway_statuses_are_transient() {
        assert!(RetryPolicy::is_transient(StatusCode::BAD_GATEWAY));
        assert!(RetryPolicy::is_transient(StatusCode::SERVICE_UNAVAILABLE));
        assert!(RetryPolicy::is_transient(StatusCode::GATEWAY_TIMEOUT));
        assert!(!RetryPolicy::is_transient(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!RetryPolicy::is_transient(StatusCode::NOT_FOUND));
        assert!(!RetryPolicy::is_transient(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn unreachable_directory_is_tried_once_per_allowed_attempt() {
        use std::sync::atomic::{AtomicU32, Ordering};

        let policy = RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_millis(1),
        };
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        let built = AtomicU32::new(0);

        let outcome = policy
            .send("org", || {
                built.fetch_add(1, Ordering::SeqCst);
                http.get("http://127.0.0.1:1/")
            })
            .await;

        assert!(outcome.is_err());
        assert_eq!(built.load(Ordering::SeqCst), 3);
    }
}
