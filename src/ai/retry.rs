//! Retry Policy and Backoff
//!
//! Drives one gateway call through an explicit state machine:
//!
//! ```text
//! Attempt(1) ──ok──▶ Success
//!     │ err
//!     ▼
//! Waiting{1, step×1} ──▶ Attempt(2) ──ok──▶ Success
//!                            │ err
//!                            ▼
//!                    Waiting{2, step×2} ──▶ Attempt(3) ──err──▶ Failed
//! ```
//!
//! The default schedule is linear (`step × n` after failed attempt `n`).
//! Sleeping is delegated to a [`Sleeper`] so tests can run without timers.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::retry as retry_constants;
use crate::types::LlmError;

// =============================================================================
// Sleeper
// =============================================================================

/// Async sleep abstraction used between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

pub type SharedSleeper = Arc<dyn Sleeper>;

/// Production sleeper backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately and records every requested delay.
///
/// Intended for tests of code that sits on top of the gateway.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// All delays requested so far, in order
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Sum of all delays requested so far
    pub fn total(&self) -> Duration {
        self.delays().into_iter().sum()
    }

    pub fn calls(&self) -> usize {
        self.delays.lock().map(|d| d.len()).unwrap_or_default()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        if let Ok(mut delays) = self.delays.lock() {
            delays.push(duration);
        }
    }
}

// =============================================================================
// Policy
// =============================================================================

/// Shape of the backoff series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackoffSchedule {
    /// `step × n`: 1s, 2s, 3s, ...
    #[default]
    Linear,
    /// `step × 2^(n-1)`: 1s, 2s, 4s, ...
    Exponential,
}

impl std::fmt::Display for BackoffSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackoffSchedule::Linear => write!(f, "linear"),
            BackoffSchedule::Exponential => write!(f, "exponential"),
        }
    }
}

/// Attempt budget and backoff for a single gateway call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    /// Backoff unit
    pub step: Duration,
    pub schedule: BackoffSchedule,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry_constants::MAX_ATTEMPTS,
            step: Duration::from_millis(retry_constants::BACKOFF_STEP_MS),
            schedule: BackoffSchedule::Linear,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, step: Duration, schedule: BackoffSchedule) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            step,
            schedule,
        }
    }

    /// Delay to wait after failed attempt `attempt` (1-based)
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let attempt = attempt.max(1);
        match self.schedule {
            BackoffSchedule::Linear => self.step.saturating_mul(attempt),
            BackoffSchedule::Exponential => {
                let factor = 1u32.checked_shl(attempt - 1).unwrap_or(u32::MAX);
                self.step.saturating_mul(factor)
            }
        }
    }

    /// Cumulative wait before attempt `attempt` is issued
    pub fn cumulative_backoff_before(&self, attempt: u32) -> Duration {
        (1..attempt).map(|n| self.backoff_after(n)).sum()
    }

    /// Run `operation` under this policy.
    ///
    /// `operation` receives the 1-based attempt number. `label` names the call
    /// in logs. Returns the first success, or the last attempt's error together
    /// with the number of attempts made.
    pub async fn run<T, F, Fut>(
        &self,
        sleeper: &dyn Sleeper,
        label: &str,
        mut operation: F,
    ) -> Result<T, RetryExhausted>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let mut state = RetryState::Attempt(1);

        loop {
            state = match state {
                RetryState::Attempt(n) => match operation(n).await {
                    Ok(value) => RetryState::Success(value),
                    Err(error) => {
                        warn!(
                            attempt = n,
                            max_attempts = self.max_attempts,
                            category = %error.category,
                            error = %error,
                            "Attempt {} failed for {}",
                            n,
                            label
                        );
                        if n >= self.max_attempts {
                            RetryState::Failed { attempts: n, error }
                        } else {
                            RetryState::Waiting {
                                completed: n,
                                delay: self.backoff_after(n),
                            }
                        }
                    }
                },
                RetryState::Waiting { completed, delay } => {
                    debug!(delay_ms = delay.as_millis() as u64, "Retrying after backoff");
                    sleeper.sleep(delay).await;
                    RetryState::Attempt(completed + 1)
                }
                RetryState::Success(value) => return Ok(value),
                RetryState::Failed { attempts, error } => {
                    return Err(RetryExhausted { attempts, error });
                }
            };
        }
    }
}

/// States of a single retried call
#[derive(Debug)]
pub enum RetryState<T> {
    /// About to issue attempt `n` (1-based)
    Attempt(u32),
    /// Attempt `completed` failed; sleeping `delay` before the next one
    Waiting { completed: u32, delay: Duration },
    Success(T),
    Failed { attempts: u32, error: LlmError },
}

/// Every attempt failed
#[derive(Debug, Clone)]
pub struct RetryExhausted {
    pub attempts: u32,
    /// The final attempt's failure
    pub error: LlmError,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ErrorCategory;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> LlmError {
        LlmError::new(ErrorCategory::Transient, "boom")
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.backoff_after(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_after(2), Duration::from_secs(2));
        assert_eq!(policy.cumulative_backoff_before(3), Duration::from_secs(3));
    }

    #[test]
    fn test_exponential_schedule() {
        let policy = RetryPolicy::new(5, Duration::from_millis(1000), BackoffSchedule::Exponential);
        assert_eq!(policy.backoff_after(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_after(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_after(3), Duration::from_secs(4));
    }

    #[test]
    fn test_zero_attempts_clamped_to_one() {
        let policy = RetryPolicy::new(0, Duration::from_millis(10), BackoffSchedule::Linear);
        assert_eq!(policy.max_attempts, 1);
    }

    #[tokio::test]
    async fn test_success_on_first_attempt_never_sleeps() {
        let sleeper = RecordingSleeper::new();
        let result = RetryPolicy::default()
            .run(&sleeper, "test", |_| async { Ok::<_, LlmError>(7) })
            .await
            .unwrap();

        assert_eq!(result, 7);
        assert_eq!(sleeper.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_on_third_attempt() {
        let sleeper = RecordingSleeper::new();
        let calls = AtomicU32::new(0);

        let result = RetryPolicy::default()
            .run(&sleeper, "test", |n| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { if n < 3 { Err(transient()) } else { Ok(n) } }
            })
            .await
            .unwrap();

        assert_eq!(result, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_exhaustion_reports_last_error() {
        let sleeper = RecordingSleeper::new();
        let calls = AtomicU32::new(0);

        let err = RetryPolicy::default()
            .run(&sleeper, "test", |n| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    Err::<(), _>(LlmError::new(ErrorCategory::Transient, format!("fail {}", n)))
                }
            })
            .await
            .unwrap_err();

        assert_eq!(err.attempts, 3);
        assert_eq!(err.error.message, "fail 3");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // No sleep after the final attempt
        assert_eq!(sleeper.calls(), 2);
    }

    proptest! {
        #[test]
        fn prop_linear_backoff_is_step_times_attempt(step_ms in 1u64..5_000, attempt in 1u32..20) {
            let policy = RetryPolicy::new(20, Duration::from_millis(step_ms), BackoffSchedule::Linear);
            prop_assert_eq!(
                policy.backoff_after(attempt),
                Duration::from_millis(step_ms * attempt as u64)
            );
        }

        #[test]
        fn prop_cumulative_backoff_is_monotonic(step_ms in 1u64..5_000, attempt in 1u32..15) {
            for schedule in [BackoffSchedule::Linear, BackoffSchedule::Exponential] {
                let policy = RetryPolicy::new(16, Duration::from_millis(step_ms), schedule);
                prop_assert!(
                    policy.cumulative_backoff_before(attempt + 1)
                        > policy.cumulative_backoff_before(attempt)
                );
            }
        }
    }
}
