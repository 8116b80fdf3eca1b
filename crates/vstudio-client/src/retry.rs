//! Read retry policy with exponential backoff and jitter.
//!
//! Only idempotent reads go through here. Saves, generation calls and
//! uploads are sent once; the user re-triggers them by hand.

use std::time::Duration;

use tracing::{info_span, warn, Instrument};

use crate::error::{StudioError, StudioResult};
use crate::metrics::record_retry;

/// Retry policy configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after the first try.
    pub max_retries: u32,
    /// Base delay for exponential backoff (in milliseconds).
    pub base_delay_ms: u64,
    /// Maximum delay cap (in milliseconds).
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 200,
            max_delay_ms: 3000,
        }
    }
}

impl RetryConfig {
    /// No retries at all.
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Create config from a variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let parse = |key: &str, fallback: u64| {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(fallback)
        };

        Self {
            max_retries: parse("STUDIO_READ_RETRIES", defaults.max_retries as u64) as u32,
            base_delay_ms: parse("STUDIO_RETRY_BASE_MS", defaults.base_delay_ms),
            max_delay_ms: parse("STUDIO_RETRY_MAX_MS", defaults.max_delay_ms),
        }
    }
}

/// Execute an idempotent async operation with retry.
///
/// Retries on network errors, timeouts, 429 (honoring `Retry-After`) and
/// 5xx. Everything else is returned immediately.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, operation: &str, op: F) -> StudioResult<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = StudioResult<T>>,
{
    let mut last_error = None;

    for attempt in 0..=config.max_retries {
        let span = info_span!("studio_retry", operation = %operation, attempt = attempt + 1);

        match op().instrument(span).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt < config.max_retries => {
                let delay = calculate_delay(config, attempt, e.retry_after_ms());

                warn!(
                    operation = %operation,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Request failed, retrying: {}",
                    e
                );

                record_retry(operation);

                tokio::time::sleep(delay).await;
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error.unwrap_or_else(|| StudioError::invalid_response("retry loop exhausted")))
}

/// Calculate retry delay with exponential backoff and full jitter.
fn calculate_delay(config: &RetryConfig, attempt: u32, retry_after_ms: Option<u64>) -> Duration {
    if let Some(after) = retry_after_ms {
        return Duration::from_millis(after);
    }

    let exp_delay = config.base_delay_ms.saturating_mul(2u64.saturating_pow(attempt));
    let capped_delay = exp_delay.min(config.max_delay_ms);

    // Time-based jitter, no rand dependency
    let jittered = if capped_delay > 0 {
        use std::time::SystemTime;
        let nanos = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        let random_factor = (nanos % 1000) as f64 / 1000.0;
        ((capped_delay as f64) * random_factor) as u64
    } else {
        0
    };

    Duration::from_millis(jittered.max(config.base_delay_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config(max_retries: u32) -> RetryConfig {
        RetryConfig {
            max_retries,
            base_delay_ms: 1,
            max_delay_ms: 2,
        }
    }

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.base_delay_ms, 200);
        assert_eq!(config.max_delay_ms, 3000);
    }

    #[test]
    fn test_retry_config_from_lookup() {
        let config = RetryConfig::from_lookup(|key| match key {
            "STUDIO_READ_RETRIES" => Some("5".into()),
            "STUDIO_RETRY_BASE_MS" => Some("oops".into()),
            _ => None,
        });
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_delay_ms, 200);
    }

    #[test]
    fn test_calculate_delay_with_retry_after() {
        let config = RetryConfig::default();
        let delay = calculate_delay(&config, 0, Some(2000));
        assert_eq!(delay, Duration::from_millis(2000));
    }

    #[test]
    fn test_calculate_delay_respects_bounds() {
        let config = RetryConfig {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 400,
        };
        let delay = calculate_delay(&config, 10, None);
        assert!(delay.as_millis() <= 400);
        assert!(delay.as_millis() >= 100);
    }

    #[tokio::test]
    async fn test_retries_server_errors_then_succeeds() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result = with_retry(&fast_config(2), "list_projects", move || async move {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(StudioError::from_http_status(503, ""))
            } else {
                Ok(7)
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_does_not_retry_client_errors() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: StudioResult<()> = with_retry(&fast_config(3), "get_project", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StudioError::from_http_status(404, ""))
        })
        .await;

        assert!(result.unwrap_err().is_not_found());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let result: StudioResult<()> = with_retry(&fast_config(2), "auth_status", move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(StudioError::from_http_status(500, ""))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }
}
