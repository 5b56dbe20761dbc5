//! Core use-case services.
//!
//! # Responsibility
//! - Enforce ownership and validation rules above the store contract.
//! - Keep command front-ends decoupled from storage details.

pub mod error;
pub mod preference_service;
pub mod task_service;
