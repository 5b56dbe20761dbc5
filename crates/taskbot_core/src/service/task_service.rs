//! Task lifecycle service.
//!
//! # Responsibility
//! - Provide add/list/update-status/edit/delete entry points for one owner.
//! - Validate input before touching the store.
//!
//! # Invariants
//! - Every mutation is filtered by `(id, owner)`; a task owned by someone
//!   else is indistinguishable from a missing one.
//! - Status may move between any two recognized values, including itself.
//! - Edits never touch `status` or `created_at`.

use crate::model::now_epoch_millis;
use crate::model::task::{normalize_description, NewTask, Task, TaskId, TaskStatus};
use crate::model::OwnerId;
use crate::repo::task_store::TaskStore;
use crate::service::error::{CoreError, CoreResult, RecordKind};
use log::{debug, info};

/// Use-case service for the task lifecycle.
pub struct TaskService<S: TaskStore> {
    store: S,
    clock: fn() -> i64,
}

impl<S: TaskStore> TaskService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: now_epoch_millis,
        }
    }

    /// Overrides the creation timestamp source (epoch milliseconds).
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Creates a pending task for `owner`.
    ///
    /// # Errors
    /// - `Validation` when `description` is blank; nothing is persisted.
    pub fn add(&self, owner: OwnerId, description: &str) -> CoreResult<Task> {
        let new_task = NewTask::pending(owner, description, (self.clock)())?;
        let task = self.store.create_task(&new_task)?;
        info!(
            "event=task_add module=task_service status=ok owner={} task_id={}",
            task.owner, task.id
        );
        Ok(task)
    }

    /// Lists all tasks of `owner` in insertion order.
    pub fn list(&self, owner: OwnerId) -> CoreResult<Vec<Task>> {
        Ok(self.store.list_tasks_by_owner(owner)?)
    }

    /// Parses a wire status string and applies it.
    ///
    /// Validation happens before the lookup, so an unknown status is
    /// reported even for a missing task.
    pub fn update_status(&self, id: TaskId, owner: OwnerId, new_status: &str) -> CoreResult<Task> {
        let status = new_status.parse::<TaskStatus>()?;
        self.set_status(id, owner, status)
    }

    /// Overwrites the status of an owned task.
    pub fn set_status(&self, id: TaskId, owner: OwnerId, status: TaskStatus) -> CoreResult<Task> {
        let mut task = self.find_owned(id, owner)?;
        let previous = task.status;
        task.status = status;
        self.store
            .save_task(&task)
            .map_err(|err| CoreError::from_store(RecordKind::Task, err))?;
        info!(
            "event=task_status module=task_service status=ok owner={} task_id={} from={} to={}",
            owner, id, previous, status
        );
        Ok(task)
    }

    /// Replaces the description of an owned task.
    pub fn edit(&self, id: TaskId, owner: OwnerId, new_description: &str) -> CoreResult<Task> {
        let description = normalize_description(new_description)?;
        let mut task = self.find_owned(id, owner)?;
        task.description = description;
        self.store
            .save_task(&task)
            .map_err(|err| CoreError::from_store(RecordKind::Task, err))?;
        info!(
            "event=task_edit module=task_service status=ok owner={} task_id={}",
            owner, id
        );
        Ok(task)
    }

    /// Deletes an owned task.
    ///
    /// Deleting a missing or foreign id is a successful no-op; callers that
    /// need confirmation must check `list` first.
    pub fn delete(&self, id: TaskId, owner: OwnerId) -> CoreResult<()> {
        let removed = self.store.delete_task_by_id_and_owner(id, owner)?;
        if removed == 0 {
            debug!(
                "event=task_delete module=task_service status=noop owner={} task_id={}",
                owner, id
            );
        } else {
            info!(
                "event=task_delete module=task_service status=ok owner={} task_id={}",
                owner, id
            );
        }
        Ok(())
    }

    fn find_owned(&self, id: TaskId, owner: OwnerId) -> CoreResult<Task> {
        self.store
            .find_task_by_id_and_owner(id, owner)?
            .ok_or(CoreError::NotFound(RecordKind::Task))
    }
}
