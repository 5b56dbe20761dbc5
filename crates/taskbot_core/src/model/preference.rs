//! Per-user reminder preference model.
//!
//! # Invariants
//! - Exactly one record per owner; `owner` is the unique key.
//! - New records default to `reminders_enabled = true`.

use super::OwnerId;
use serde::{Deserialize, Serialize};

/// Store-assigned preference identifier.
pub type PreferenceId = i64;

/// Reminder opt-in default for owners seen for the first time.
pub const DEFAULT_REMINDERS_ENABLED: bool = true;

/// Persisted reminder preference for one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPreference {
    pub id: PreferenceId,
    pub owner: OwnerId,
    pub reminders_enabled: bool,
}
