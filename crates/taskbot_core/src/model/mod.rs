//! Domain model for tasks and reminder preferences.
//!
//! # Responsibility
//! - Define the records shared by services, stores and the reminder sweep.
//! - Own input validation rules that do not need storage access.
//!
//! # Invariants
//! - Every task and preference is partitioned by `OwnerId`.
//! - Task status strings are part of the persisted-state contract.

pub mod preference;
pub mod task;

/// Opaque user identifier (stable per chat/account).
pub type OwnerId = i64;

/// Returns current wall-clock time as Unix epoch milliseconds.
pub fn now_epoch_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
