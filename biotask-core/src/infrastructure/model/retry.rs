//! Exponential backoff around provider calls.
//!
//! Wraps `backon::Retryable` with an explicit policy: attempt ceiling,
//! base delay, delay cap and the predicate deciding what is retried.

use crate::config::RetrySettings;
use backon::{ExponentialBuilder, Retryable};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Errors that may succeed when the same request is sent again.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: usize,
    base_delay: Duration,
    max_delay: Duration,
    jitter: bool,
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: max_delay.max(base_delay),
            jitter: false,
        }
    }

    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(
            settings.max_attempts,
            settings.base_delay(),
            settings.max_delay(),
        )
        .with_jitter(settings.jitter)
    }

    /// Single attempt, no waiting.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO, Duration::ZERO)
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// backon adds up to 100% jitter on top of the capped delay, so the
    /// jittered schedule is capped at half of `max_delay`.
    fn backoff(&self) -> ExponentialBuilder {
        let cap = if self.jitter {
            self.max_delay / 2
        } else {
            self.max_delay
        };
        let builder = ExponentialBuilder::new()
            .with_min_delay(self.base_delay.min(cap))
            .with_max_delay(cap)
            .with_factor(2.0)
            .with_max_times(self.max_attempts - 1);
        if self.jitter {
            builder.with_jitter()
        } else {
            builder
        }
    }

    /// Run `operation`, retrying transient failures until attempts run out.
    pub async fn run<T, E, F, Fut>(&self, label: &str, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Transient + Display,
    {
        let max_delay = self.max_delay;
        operation
            .retry(self.backoff())
            .sleep(move |delay: Duration| tokio::time::sleep(delay.min(max_delay)))
            .when(|err: &E| err.is_transient())
            .notify(|err: &E, delay: Duration| {
                warn!(
                    operation = label,
                    error = %err,
                    delay_ms = delay.min(max_delay).as_millis() as u64,
                    "Transient provider error, retrying"
                );
            })
            .await
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_settings(&RetrySettings::default())
    }
}
