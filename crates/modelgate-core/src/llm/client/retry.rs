//! Retry logic with credential rotation

use crate::error::{GateResult, RetryFailure};
use crate::llm::rotator::KeyRotator;
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

/// Largest exponent used for backoff; keeps the delay representable
const MAX_BACKOFF_EXPONENT: u32 = 16;

/// Something that can switch to the next credential after a failure
#[cfg_attr(test, mockall::automock)]
pub trait RotateCredential: Send + Sync {
    fn advance(&self);
}

impl RotateCredential for KeyRotator {
    fn advance(&self) {
        KeyRotator::advance(self)
    }
}

/// Bounded retry with exponential backoff and jitter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first
    pub max_retries: u32,
    /// Multiplier applied to `2^attempt + jitter`
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Scale every backoff delay by `unit` instead of one second
    pub fn with_backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = unit;
        self
    }

    /// Run `operation` until it succeeds or attempts run out.
    ///
    /// After each retryable failure the rotator advances to the next
    /// credential and the call sleeps for [`backoff_delay`]. A non-retryable
    /// error ends the call at once.
    ///
    /// # Errors
    ///
    /// Returns a [`RetryFailure`] holding the last error and the number of
    /// attempts made.
    #[instrument(skip(self, rotator, operation), fields(max_retries = self.max_retries))]
    pub async fn execute<T, F, Fut>(
        &self,
        rotator: &dyn RotateCredential,
        mut operation: F,
    ) -> Result<T, RetryFailure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = GateResult<T>>,
    {
        let max_retries = self.max_retries.max(1);
        let mut attempts = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempts > 0 {
                        info!(attempt = attempts + 1, "request succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(err) => {
                    attempts += 1;

                    if !err.is_retryable() {
                        warn!(error = %err, attempt = attempts, "non-retryable error");
                        return Err(RetryFailure::new(err, attempts));
                    }

                    if attempts >= max_retries {
                        error!(attempts, error = %err, "all retry attempts exhausted");
                        return Err(RetryFailure::new(err, attempts));
                    }

                    rotator.advance();
                    let delay = backoff_delay(attempts, self.backoff_unit);
                    warn!(
                        attempt = attempts,
                        max_attempts = max_retries,
                        delay_secs = delay.as_secs_f64(),
                        error = %err,
                        "request failed, retrying with next credential"
                    );
                    sleep(delay).await;
                    debug!(attempt = attempts + 1, "retrying");
                }
            }
        }
    }
}

/// Delay before the retry that follows failed attempt `attempt`:
/// `unit × (2^attempt + U[0, 1))`
pub fn backoff_delay(attempt: u32, unit: Duration) -> Duration {
    let base = 2f64.powi(attempt.min(MAX_BACKOFF_EXPONENT) as i32);
    let jitter: f64 = rand::thread_rng().gen_range(0.0..1.0);
    unit.mul_f64(base + jitter)
}
