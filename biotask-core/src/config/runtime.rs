use super::defaults::*;
use super::error::ConfigError;
use crate::constants::DEFAULT_MAX_DELAY_SECS;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backoff applied around every provider call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetrySettings {
    /// Total attempts, the first call included
    pub max_attempts: usize,
    pub base_delay_ms: u64,
    pub max_delay_secs: u64,
    pub jitter: bool,
}

impl RetrySettings {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn max_delay(&self) -> Duration {
        Duration::from_secs(self.max_delay_secs)
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            max_delay_secs: DEFAULT_MAX_DELAY_SECS,
            jitter: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawRetrySettings {
    pub(super) max_attempts: Option<usize>,
    pub(super) base_delay_ms: Option<u64>,
    pub(super) max_delay_secs: Option<u64>,
    pub(super) jitter: Option<bool>,
}

impl TryFrom<RawRetrySettings> for RetrySettings {
    type Error = ConfigError;

    fn try_from(raw: RawRetrySettings) -> Result<Self, Self::Error> {
        let defaults = RetrySettings::default();
        let settings = Self {
            max_attempts: raw.max_attempts.unwrap_or(defaults.max_attempts),
            base_delay_ms: raw.base_delay_ms.unwrap_or(defaults.base_delay_ms),
            max_delay_secs: raw.max_delay_secs.unwrap_or(defaults.max_delay_secs),
            jitter: raw.jitter.unwrap_or(defaults.jitter),
        };
        if settings.max_attempts == 0 {
            return Err(ConfigError::invalid(
                "retry.max_attempts",
                "must allow at least one attempt",
            ));
        }
        if settings.max_delay() < settings.base_delay() {
            return Err(ConfigError::invalid(
                "retry.max_delay_secs",
                format!(
                    "{}s is shorter than base delay of {}ms",
                    settings.max_delay_secs, settings.base_delay_ms
                ),
            ));
        }
        Ok(settings)
    }
}

/// Out-of-process interpreter used to run generated code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExecutorSettings {
    pub interpreter: String,
    pub timeout_secs: u64,
}

impl ExecutorSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            timeout_secs: DEFAULT_EXECUTION_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawExecutorSettings {
    pub(super) interpreter: Option<String>,
    pub(super) timeout_secs: Option<u64>,
}

impl TryFrom<RawExecutorSettings> for ExecutorSettings {
    type Error = ConfigError;

    fn try_from(raw: RawExecutorSettings) -> Result<Self, Self::Error> {
        let defaults = ExecutorSettings::default();
        let interpreter = raw
            .interpreter
            .map(|value| shellexpand::tilde(value.trim()).into_owned())
            .unwrap_or(defaults.interpreter);
        if interpreter.is_empty() {
            return Err(ConfigError::invalid("executor.interpreter", "must not be empty"));
        }
        let timeout_secs = raw.timeout_secs.unwrap_or(defaults.timeout_secs);
        if timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "executor.timeout_secs",
                "must be greater than zero",
            ));
        }
        Ok(Self {
            interpreter,
            timeout_secs,
        })
    }
}
