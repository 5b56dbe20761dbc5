//! Stale-task reminder sweep.
//!
//! # Responsibility
//! - Find pending tasks older than the staleness threshold.
//! - Notify each opted-in owner once per sweep with one consolidated message.
//! - Run sweeps on a fixed interval until cancelled.
//!
//! # Invariants
//! - One owner's store or delivery failure never stops other owners, and
//!   never stops the timer loop.
//! - Owners without a preference record are created enabled (default-on).

pub mod grouping;
pub mod runner;
pub mod scheduler;

pub use grouping::{group_by_owner, OwnerTasks};
pub use runner::run_periodic;
pub use scheduler::{compose_reminder, ReminderScheduler, SweepReport};
