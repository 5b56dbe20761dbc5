//! Process configuration from environment variables.

use std::path::PathBuf;
use taskbot_core::{ConfigError, OwnerId, ReminderConfig};

pub const ENV_DB_PATH: &str = "TASKBOT_DB_PATH";
pub const ENV_LOG_DIR: &str = "TASKBOT_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "TASKBOT_LOG_LEVEL";
pub const ENV_OWNER_ID: &str = "TASKBOT_OWNER_ID";
pub const ENV_SWEEP_INTERVAL_SECS: &str = "TASKBOT_SWEEP_INTERVAL_SECS";
pub const ENV_STALE_AFTER_SECS: &str = "TASKBOT_STALE_AFTER_SECS";
pub const ENV_MAX_SEND_ATTEMPTS: &str = "TASKBOT_MAX_SEND_ATTEMPTS";
pub const ENV_RETRY_BACKOFF_SECS: &str = "TASKBOT_RETRY_BACKOFF_SECS";

const DEFAULT_DB_PATH: &str = "taskbot.db";
const DEFAULT_OWNER_ID: OwnerId = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// `None` logs to stderr.
    pub log_dir: Option<String>,
    pub log_level: Option<String>,
    /// Chat identity used for commands typed on stdin.
    pub owner: OwnerId,
    pub reminders: ReminderConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from a key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = ReminderConfig::default();
        let reminders = ReminderConfig {
            sweep_interval_secs: parse_or(
                ENV_SWEEP_INTERVAL_SECS,
                get(ENV_SWEEP_INTERVAL_SECS),
                defaults.sweep_interval_secs,
            )?,
            stale_after_secs: parse_or(
                ENV_STALE_AFTER_SECS,
                get(ENV_STALE_AFTER_SECS),
                defaults.stale_after_secs,
            )?,
            max_send_attempts: parse_or(
                ENV_MAX_SEND_ATTEMPTS,
                get(ENV_MAX_SEND_ATTEMPTS),
                defaults.max_send_attempts,
            )?,
            retry_backoff_secs: parse_or(
                ENV_RETRY_BACKOFF_SECS,
                get(ENV_RETRY_BACKOFF_SECS),
                defaults.retry_backoff_secs,
            )?,
        };
        reminders.validate()?;

        Ok(Self {
            db_path: get(ENV_DB_PATH).map_or_else(|| PathBuf::from(DEFAULT_DB_PATH), PathBuf::from),
            log_dir: get(ENV_LOG_DIR),
            log_level: get(ENV_LOG_LEVEL),
            owner: parse_or(ENV_OWNER_ID, get(ENV_OWNER_ID), DEFAULT_OWNER_ID)?,
            reminders,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
    }
}
