//! Task store contracts and implementations.
//!
//! # Responsibility
//! - Define the persistence contract consumed by services and the reminder
//!   sweep.
//! - Isolate SQL details from lifecycle and reminder logic.
//!
//! # Invariants
//! - Stores return semantic errors (`NotFound`, `Conflict`) in addition to
//!   backend failures.
//! - The store is the only arbiter of consistency; callers hold no
//!   authoritative copies across calls.

pub mod memory_store;
pub mod sqlite_store;
pub mod task_store;
