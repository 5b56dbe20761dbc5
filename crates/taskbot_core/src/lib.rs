//! Core domain logic for the task tracker.
//! This crate owns the task lifecycle rules, reminder preferences and the
//! stale-task reminder sweep. Transports and storage engines plug in through
//! the `TaskStore` and `Notifier` traits.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod reminder;
pub mod repo;
pub mod retry;
pub mod service;

pub use config::{ConfigError, ReminderConfig};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::preference::UserPreference;
pub use model::task::{NewTask, Task, TaskId, TaskStatus, ValidationError};
pub use model::{now_epoch_millis, OwnerId};
pub use notify::{send_with_retry, Notifier, NotifyError};
pub use reminder::{group_by_owner, run_periodic, OwnerTasks, ReminderScheduler, SweepReport};
pub use repo::memory_store::MemoryTaskStore;
pub use repo::sqlite_store::SqliteTaskStore;
pub use repo::task_store::{StoreError, StoreResult, TaskStore};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use service::error::{CoreError, CoreResult, RecordKind};
pub use service::preference_service::PreferenceService;
pub use service::task_service::TaskService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
