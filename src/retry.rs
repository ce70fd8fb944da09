/*!
 * Retry with exponential backoff.
 *
 * Every HTTP call goes through [`retry`]: the operation is attempted once and,
 * on failure, retried up to `max_retries` more times. The delay before retry
 * `n` (1-based) is `initial_delay * factor^(n-1)`, capped at [`MAX_DELAY`].
 * There is no jitter and no
 * distinction between failure kinds; callers decide what counts as a failure
 * by what they return as `Err`.
 */

use log::warn;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::errors::FetchError;

/// Longest sleep between two attempts
pub const MAX_DELAY: Duration = Duration::from_secs(300);

/// Parameters of an exponential backoff schedule
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Multiplier applied after each retry
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            max_retries,
            initial_delay,
            backoff_factor,
        }
    }

    /// Total attempts allowed, first one included
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay slept before retry number `retry` (1-based), saturating at [`MAX_DELAY`]
    pub fn delay_for(&self, retry: u32) -> Duration {
        if self.initial_delay.is_zero() {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry.saturating_sub(1)).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_factor.powi(exponent);
        Duration::try_from_secs_f64(secs).map_or(MAX_DELAY, |delay| delay.min(MAX_DELAY))
    }
}

/// Run `operation` under `policy`, sleeping with `sleep` between attempts.
///
/// `operation` receives the 1-based attempt number. After the last failed
/// attempt the error is returned as [`FetchError::RetriesExhausted`].
pub async fn retry_with_backoff<T, E, Op, OpFut, Sl, SlFut>(
    policy: &RetryPolicy,
    mut sleep: Sl,
    mut operation: Op,
) -> Result<T, FetchError>
where
    E: Display,
    Op: FnMut(u32) -> OpFut,
    OpFut: Future<Output = Result<T, E>>,
    Sl: FnMut(Duration) -> SlFut,
    SlFut: Future<Output = ()>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt >= max_attempts {
                    return Err(FetchError::RetriesExhausted {
                        attempts: attempt,
                        last_error: e.to_string(),
                    });
                }

                let delay = policy.delay_for(attempt);
                warn!(
                    "Attempt {}/{} failed: {} - retrying in {:.1}s",
                    attempt,
                    max_attempts,
                    e,
                    delay.as_secs_f64()
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// [`retry_with_backoff`] sleeping on the tokio timer
pub async fn retry<T, E, Op, OpFut>(policy: &RetryPolicy, operation: Op) -> Result<T, FetchError>
where
    E: Display,
    Op: FnMut(u32) -> OpFut,
    OpFut: Future<Output = Result<T, E>>,
{
    retry_with_backoff(policy, tokio::time::sleep, operation).await
}
