//! # Read Retry
//!
//! Exponential backoff around idempotent backend reads.
//!
//! ## Attempt Timeline (defaults)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  attempt 1 ──✗──► wait 1s ──► attempt 2 ──✗──► wait 2s ──► attempt 3   │
//! │                                                                 │       │
//! │                                          ✓ → value   ✗ → last error     │
//! │                                                                         │
//! │  Retried:      Unavailable, Timeout                                     │
//! │  Not retried:  Rejected, CustomerNotFound, Core, anything else          │
//! │  Never used for invoice submission.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::error::BillingResult;

/// How often and how patiently a read is attempted.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: f64,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1_000),
            multiplier: 2.0,
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// A single attempt.
    pub fn no_retry() -> Self {
        RetryPolicy {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Deterministic backoff: no jitter, no elapsed-time cap.
    fn create_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_backoff,
            initial_interval: self.initial_backoff,
            randomization_factor: 0.0,
            multiplier: self.multiplier,
            max_interval: self.max_backoff,
            max_elapsed_time: None,
            ..ExponentialBackoff::default()
        }
    }
}

/// Runs `call` until it succeeds, fails with a non-retryable error, or
/// `policy.max_attempts` is used up. Returns the last error in the latter
/// two cases.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut call: F,
) -> BillingResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = BillingResult<T>>,
{
    let mut backoff = policy.create_backoff();
    let mut attempt = 1u32;

    loop {
        match call().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(operation, attempt, "Read succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) if err.is_retryable() && attempt < policy.max_attempts => {
                let delay = backoff.next_backoff().unwrap_or(policy.max_backoff);
                warn!(operation, attempt, ?delay, error = %err, "Read failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => {
                if err.is_retryable() {
                    error!(operation, attempts = attempt, error = %err, "Read failed, giving up");
                }
                return Err(err);
            }
        }
    }
}
