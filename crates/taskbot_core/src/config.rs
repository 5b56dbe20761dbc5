//! Reminder configuration.
//!
//! # Invariants
//! - Every field has a default, so partial documents deserialize.
//! - `validate()` rejects zero interval, zero threshold and zero attempts.

use crate::retry::{RetryPolicy, DEFAULT_BACKOFF, DEFAULT_MAX_ATTEMPTS};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Duration;

pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60 * 60;
pub const DEFAULT_STALE_AFTER_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Field must be strictly positive.
    Zero(&'static str),
    /// Raw value could not be parsed.
    Invalid { key: String, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Zero(field) => write!(f, "`{field}` must be greater than zero"),
            Self::Invalid { key, value } => write!(f, "invalid value `{value}` for `{key}`"),
        }
    }
}

impl Error for ConfigError {}

/// Tunables for the reminder sweep and its delivery retries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Wait between two sweeps.
    pub sweep_interval_secs: u64,
    /// Age after which a pending task counts as stale.
    pub stale_after_secs: u64,
    pub max_send_attempts: u32,
    pub retry_backoff_secs: u64,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            stale_after_secs: DEFAULT_STALE_AFTER_SECS,
            max_send_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_backoff_secs: DEFAULT_BACKOFF.as_secs(),
        }
    }
}

impl ReminderConfig {
    pub fn with_sweep_interval_secs(mut self, secs: u64) -> Self {
        self.sweep_interval_secs = secs;
        self
    }

    pub fn with_stale_after_secs(mut self, secs: u64) -> Self {
        self.stale_after_secs = secs;
        self
    }

    pub fn with_max_send_attempts(mut self, attempts: u32) -> Self {
        self.max_send_attempts = attempts;
        self
    }

    pub fn with_retry_backoff_secs(mut self, secs: u64) -> Self {
        self.retry_backoff_secs = secs;
        self
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }

    /// Staleness threshold in epoch milliseconds, saturating at `i64::MAX`.
    pub fn stale_after_millis(&self) -> i64 {
        i64::try_from(self.stale_after().as_millis()).unwrap_or(i64::MAX)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_send_attempts,
            Duration::from_secs(self.retry_backoff_secs),
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep_interval_secs == 0 {
            return Err(ConfigError::Zero("sweep_interval_secs"));
        }
        if self.stale_after_secs == 0 {
            return Err(ConfigError::Zero("stale_after_secs"));
        }
        if self.max_send_attempts == 0 {
            return Err(ConfigError::Zero("max_send_attempts"));
        }
        Ok(())
    }
}
