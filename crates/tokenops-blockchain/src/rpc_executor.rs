use std::time::Duration;

use alloy::transports::{RpcError, TransportErrorKind};
use tokenops_domain::ChainId;
use tokenops_observability::record_chain_rpc_retry;
use tokio::time::sleep;

use crate::rpc_rate_limiter::RpcRateLimiter;

/// Bounded retry for idempotent reads. Submissions never go through here.
#[derive(Debug, Clone)]
pub(crate) struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub(crate) fn read_default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(2),
        }
    }
}

pub(crate) trait RetryableError: std::fmt::Display {
    fn is_retryable(&self) -> bool;
    fn backoff_hint(&self) -> Option<Duration> {
        None
    }
}

impl RetryableError for RpcError<TransportErrorKind> {
    fn is_retryable(&self) -> bool {
        match self {
            RpcError::Transport(kind) => match kind {
                TransportErrorKind::MissingBatchResponse(_) | TransportErrorKind::BackendGone => {
                    true
                }
                TransportErrorKind::HttpError(http) => {
                    http.is_rate_limit_err() || http.is_temporarily_unavailable()
                }
                TransportErrorKind::Custom(custom) => {
                    let msg = custom.to_string().to_ascii_lowercase();
                    msg.contains("too many requests") || msg.contains("rate limit")
                }
                _ => false,
            },
            // Reverts come back as error responses and are never retryable.
            RpcError::ErrorResp(payload) => payload.is_retry_err(),
            RpcError::NullResp => true,
            RpcError::DeserError { text, .. } => {
                let lowered = text.to_ascii_lowercase();
                lowered.contains("rate limit") || lowered.contains("too many requests")
            }
            _ => false,
        }
    }

    fn backoff_hint(&self) -> Option<Duration> {
        let RpcError::ErrorResp(payload) = self else {
            return None;
        };

        let Ok(data) = payload.try_data_as::<serde_json::Value>()? else {
            return None;
        };

        let backoff_seconds = data["rate"]["backoff_seconds"].as_f64()?;
        Some(Duration::from_secs(backoff_seconds.ceil() as u64))
    }
}

pub(crate) fn backoff_delay(
    policy: &RetryPolicy,
    attempt: usize,
    hint: Option<Duration>,
) -> Duration {
    if let Some(hint) = hint {
        return hint.min(policy.max_delay);
    }

    let base_ms = policy.base_delay.as_millis() as u64;
    let exponent = (attempt.saturating_sub(1)).min(6) as u32;
    let factor = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
    let delay_ms = base_ms.saturating_mul(factor);
    let max_ms = policy.max_delay.as_millis() as u64;

    Duration::from_millis(delay_ms.min(max_ms))
}

/// Run `operation` under the chain's rate limit, retrying transient failures.
pub(crate) async fn execute_with_retry<T, E, F, O>(
    policy: &RetryPolicy,
    rate_limiter: &RpcRateLimiter,
    chain_id: ChainId,
    label: &str,
    mut operation: F,
) -> Result<T, E>
where
    E: RetryableError,
    F: FnMut() -> O,
    O: std::future::IntoFuture<Output = Result<T, E>>,
{
    let mut attempt = 1;

    loop {
        rate_limiter.acquire().await;
        match operation().into_future().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= policy.max_attempts || !err.is_retryable() {
                    return Err(err);
                }

                let delay = backoff_delay(policy, attempt, err.backoff_hint());
                tracing::warn!(
                    chain_id = %chain_id,
                    attempt,
                    max_attempts = policy.max_attempts,
                    delay_ms = delay.as_millis(),
                    error = %err,
                    "{} failed; retrying",
                    label
                );
                record_chain_rpc_retry(chain_id.get(), label);
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug)]
    struct FlakyError {
        retryable: bool,
    }

    impl std::fmt::Display for FlakyError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "flaky (retryable: {})", self.retryable)
        }
    }

    impl RetryableError for FlakyError {
        fn is_retryable(&self) -> bool {
            self.retryable
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = RetryPolicy::read_default();
        assert_eq!(backoff_delay(&policy, 1, None), Duration::from_millis(200));
        assert_eq!(backoff_delay(&policy, 2, None), Duration::from_millis(400));
        assert_eq!(backoff_delay(&policy, 10, None), Duration::from_secs(2));
    }

    #[test]
    fn backoff_hint_is_capped_by_policy() {
        let policy = RetryPolicy::read_default();
        assert_eq!(
            backoff_delay(&policy, 1, Some(Duration::from_secs(30))),
            Duration::from_secs(2)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn retries_transient_errors_until_success() {
        let calls = AtomicUsize::new(0);
        let limiter = RpcRateLimiter::per_second(None);

        let result: Result<u64, FlakyError> = execute_with_retry(
            &RetryPolicy::read_default(),
            &limiter,
            ChainId::new(31_337),
            "eth_blockNumber",
            || {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if attempt < 2 {
                        Err(FlakyError { retryable: true })
                    } else {
                        Ok(42)
                    }
                }
            },
        )
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicUsize::new(0);
        let limiter = RpcRateLimiter::per_second(None);

        let result: Result<u64, FlakyError> = execute_with_retry(
            &RetryPolicy::read_default(),
            &limiter,
            ChainId::new(31_337),
            "eth_call",
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(FlakyError { retryable: false }) }
            },
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
