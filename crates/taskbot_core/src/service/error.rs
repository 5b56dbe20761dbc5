//! Error surface returned by lifecycle and preference services.

use crate::model::task::ValidationError;
use crate::repo::task_store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CoreResult<T> = Result<T, CoreError>;

/// Which record kind a `NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Task,
    Preference,
}

impl RecordKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Preference => "preference",
        }
    }
}

/// Service error.
///
/// `NotFound` never distinguishes an absent record from one owned by
/// another user.
#[derive(Debug)]
pub enum CoreError {
    /// Bad input the caller can correct.
    Validation(ValidationError),
    NotFound(RecordKind),
    /// Opaque persistence failure.
    Store(StoreError),
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(kind) => write!(f, "{} not found", kind.as_str()),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for CoreError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl CoreError {
    /// Maps a store error, turning `StoreError::NotFound` into `NotFound(kind)`.
    pub(crate) fn from_store(kind: RecordKind, err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound(kind),
            other => Self::Store(other),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
