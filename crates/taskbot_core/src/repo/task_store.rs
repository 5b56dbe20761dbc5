//! Task store contract shared by all storage backends.

use crate::db::DbError;
use crate::model::preference::UserPreference;
use crate::model::task::{NewTask, Task, TaskId, TaskStatus};
use crate::model::OwnerId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level failure.
///
/// Callers only interpret `NotFound` and `Conflict`; everything else is an
/// opaque backend failure.
#[derive(Debug)]
pub enum StoreError {
    /// Row targeted by an update does not exist (or is not owned).
    NotFound,
    /// Unique constraint rejected an insert.
    Conflict(String),
    Db(DbError),
    /// Persisted row cannot be mapped back to the domain model.
    InvalidData(String),
    /// Backend is unusable (e.g. poisoned connection lock).
    Unavailable(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "record not found"),
            Self::Conflict(message) => write!(f, "unique constraint conflict: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Unavailable(message) => write!(f, "store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence contract for tasks and reminder preferences.
///
/// Implementations must be shareable between command handling and the
/// reminder sweep, hence `Send + Sync`.
pub trait TaskStore: Send + Sync {
    /// Inserts a task and returns it with its store-assigned id.
    fn create_task(&self, task: &NewTask) -> StoreResult<Task>;
    /// Finds one task matching both `id` and `owner`.
    fn find_task_by_id_and_owner(&self, id: TaskId, owner: OwnerId) -> StoreResult<Option<Task>>;
    /// Lists all tasks of `owner` in insertion order.
    fn list_tasks_by_owner(&self, owner: OwnerId) -> StoreResult<Vec<Task>>;
    /// Persists description and status of an existing task.
    ///
    /// Returns `NotFound` when no row matches `(task.id, task.owner)`.
    fn save_task(&self, task: &Task) -> StoreResult<()>;
    /// Deletes by `(id, owner)` predicate and returns the removed row count.
    fn delete_task_by_id_and_owner(&self, id: TaskId, owner: OwnerId) -> StoreResult<usize>;
    /// Lists tasks in `status` created at or before `cutoff_epoch_ms`, in
    /// insertion order.
    fn find_tasks_by_status_older_than(
        &self,
        status: TaskStatus,
        cutoff_epoch_ms: i64,
    ) -> StoreResult<Vec<Task>>;
    fn get_preference_by_owner(&self, owner: OwnerId) -> StoreResult<Option<UserPreference>>;
    /// Inserts a preference; returns `Conflict` when `owner` already has one.
    fn create_preference(
        &self,
        owner: OwnerId,
        reminders_enabled: bool,
    ) -> StoreResult<UserPreference>;
    /// Returns `NotFound` when the preference row no longer exists.
    fn save_preference(&self, preference: &UserPreference) -> StoreResult<()>;
}

macro_rules! forward_task_store {
    ($inner:ident) => {
        fn create_task(&self, task: &NewTask) -> StoreResult<Task> {
            <$inner as TaskStore>::create_task(self, task)
        }

        fn find_task_by_id_and_owner(
            &self,
            id: TaskId,
            owner: OwnerId,
        ) -> StoreResult<Option<Task>> {
            <$inner as TaskStore>::find_task_by_id_and_owner(self, id, owner)
        }

        fn list_tasks_by_owner(&self, owner: OwnerId) -> StoreResult<Vec<Task>> {
            <$inner as TaskStore>::list_tasks_by_owner(self, owner)
        }

        fn save_task(&self, task: &Task) -> StoreResult<()> {
            <$inner as TaskStore>::save_task(self, task)
        }

        fn delete_task_by_id_and_owner(&self, id: TaskId, owner: OwnerId) -> StoreResult<usize> {
            <$inner as TaskStore>::delete_task_by_id_and_owner(self, id, owner)
        }

        fn find_tasks_by_status_older_than(
            &self,
            status: TaskStatus,
            cutoff_epoch_ms: i64,
        ) -> StoreResult<Vec<Task>> {
            <$inner as TaskStore>::find_tasks_by_status_older_than(self, status, cutoff_epoch_ms)
        }

        fn get_preference_by_owner(&self, owner: OwnerId) -> StoreResult<Option<UserPreference>> {
            <$inner as TaskStore>::get_preference_by_owner(self, owner)
        }

        fn create_preference(
            &self,
            owner: OwnerId,
            reminders_enabled: bool,
        ) -> StoreResult<UserPreference> {
            <$inner as TaskStore>::create_preference(self, owner, reminders_enabled)
        }

        fn save_preference(&self, preference: &UserPreference) -> StoreResult<()> {
            <$inner as TaskStore>::save_preference(self, preference)
        }
    };
}

impl<S: TaskStore + ?Sized> TaskStore for &S {
    forward_task_store!(S);
}

impl<S: TaskStore + ?Sized> TaskStore for Arc<S> {
    forward_task_store!(S);
}
