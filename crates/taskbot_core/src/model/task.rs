//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its status set.
//! - Normalize and validate user-provided descriptions and status strings.
//!
//! # Invariants
//! - `description` is never blank after trimming.
//! - `created_at` is assigned once at creation and never rewritten.
//! - Status wire strings are exactly `Pending`, `InProgress`, `Completed`.

use super::OwnerId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned task identifier, monotonic within one store.
pub type TaskId = i64;

/// Task lifecycle state.
///
/// Any status may move to any other status; there is no transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Created and not started yet. Only pending tasks are reminded.
    Pending,
    /// Work has started.
    InProgress,
    /// Done.
    Completed,
}

impl TaskStatus {
    /// All recognized statuses in declaration order.
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    /// Returns the persisted wire string for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    /// Parses an exact wire string. Matching is case-sensitive.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ValidationError::UnknownStatus(value.to_string()))
    }
}

/// Input validation failures surfaced to callers for correction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Description is empty or whitespace-only.
    EmptyDescription,
    /// Status string is not one of the recognized wire values.
    UnknownStatus(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "task description must not be empty"),
            Self::UnknownStatus(value) => write!(
                f,
                "invalid status `{value}`; expected Pending|InProgress|Completed"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Canonical persisted task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub owner: OwnerId,
    pub description: String,
    pub status: TaskStatus,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Insert model for a task that has no store-assigned id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub owner: OwnerId,
    pub description: String,
    pub status: TaskStatus,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl NewTask {
    /// Builds a pending task after validating `description`.
    ///
    /// The stored description is the trimmed input.
    pub fn pending(
        owner: OwnerId,
        description: &str,
        created_at: i64,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            owner,
            description: normalize_description(description)?,
            status: TaskStatus::Pending,
            created_at,
        })
    }

    /// Attaches a store-assigned id.
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            owner: self.owner,
            description: self.description,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

/// Trims a description and rejects blank input.
pub fn normalize_description(value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}
