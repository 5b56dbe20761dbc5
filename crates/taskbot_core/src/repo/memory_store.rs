//! In-memory task store.
//!
//! Mirrors `SqliteTaskStore` semantics (monotonic ids starting at 1,
//! insertion ordering, unique owner per preference) without a database.
//! Used as a fake in tests and for throwaway sessions.

use crate::model::preference::UserPreference;
use crate::model::task::{NewTask, Task, TaskId, TaskStatus};
use crate::model::OwnerId;
use crate::repo::task_store::{StoreError, StoreResult, TaskStore};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    last_task_id: TaskId,
    last_preference_id: i64,
    tasks: BTreeMap<TaskId, Task>,
    preferences: BTreeMap<OwnerId, UserPreference>,
}

#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    state: Mutex<MemoryState>,
}

impl MemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted tasks across all owners.
    pub fn task_count(&self) -> usize {
        self.state().map_or(0, |state| state.tasks.len())
    }

    /// Number of persisted preference records across all owners.
    pub fn preference_count(&self) -> usize {
        self.state().map_or(0, |state| state.preferences.len())
    }

    fn state(&self) -> StoreResult<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl TaskStore for MemoryTaskStore {
    fn create_task(&self, task: &NewTask) -> StoreResult<Task> {
        let mut state = self.state()?;
        state.last_task_id += 1;
        let created = task.clone().into_task(state.last_task_id);
        state.tasks.insert(created.id, created.clone());
        Ok(created)
    }

    fn find_task_by_id_and_owner(&self, id: TaskId, owner: OwnerId) -> StoreResult<Option<Task>> {
        Ok(self
            .state()?
            .tasks
            .get(&id)
            .filter(|task| task.owner == owner)
            .cloned())
    }

    fn list_tasks_by_owner(&self, owner: OwnerId) -> StoreResult<Vec<Task>> {
        Ok(self
            .state()?
            .tasks
            .values()
            .filter(|task| task.owner == owner)
            .cloned()
            .collect())
    }

    fn save_task(&self, task: &Task) -> StoreResult<()> {
        let mut state = self.state()?;
        let stored = state
            .tasks
            .get_mut(&task.id)
            .filter(|stored| stored.owner == task.owner)
            .ok_or(StoreError::NotFound)?;
        stored.description = task.description.clone();
        stored.status = task.status;
        Ok(())
    }

    fn delete_task_by_id_and_owner(&self, id: TaskId, owner: OwnerId) -> StoreResult<usize> {
        let mut state = self.state()?;
        let owned = state.tasks.get(&id).is_some_and(|task| task.owner == owner);
        if !owned {
            return Ok(0);
        }
        state.tasks.remove(&id);
        Ok(1)
    }

    fn find_tasks_by_status_older_than(
        &self,
        status: TaskStatus,
        cutoff_epoch_ms: i64,
    ) -> StoreResult<Vec<Task>> {
        Ok(self
            .state()?
            .tasks
            .values()
            .filter(|task| task.status == status && task.created_at <= cutoff_epoch_ms)
            .cloned()
            .collect())
    }

    fn get_preference_by_owner(&self, owner: OwnerId) -> StoreResult<Option<UserPreference>> {
        Ok(self.state()?.preferences.get(&owner).cloned())
    }

    fn create_preference(
        &self,
        owner: OwnerId,
        reminders_enabled: bool,
    ) -> StoreResult<UserPreference> {
        let mut state = self.state()?;
        if state.preferences.contains_key(&owner) {
            return Err(StoreError::Conflict(format!(
                "preference for owner {owner} already exists"
            )));
        }

        state.last_preference_id += 1;
        let preference = UserPreference {
            id: state.last_preference_id,
            owner,
            reminders_enabled,
        };
        state.preferences.insert(owner, preference.clone());
        Ok(preference)
    }

    fn save_preference(&self, preference: &UserPreference) -> StoreResult<()> {
        let mut state = self.state()?;
        let stored = state
            .preferences
            .get_mut(&preference.owner)
            .filter(|stored| stored.id == preference.id)
            .ok_or(StoreError::NotFound)?;
        stored.reminders_enabled = preference.reminders_enabled;
        Ok(())
    }
}
