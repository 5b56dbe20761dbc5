//! SQLite-backed task store.
//!
//! # Responsibility
//! - Map `TaskStore` operations to SQL over the `tasks` and
//!   `user_preferences` tables.
//! - Translate unique-constraint violations into `StoreError::Conflict`.
//!
//! # Invariants
//! - One connection per store, guarded by a mutex; SQLite serializes writers
//!   across separate connections to the same file.
//! - Read paths reject rows that do not map back to the domain model.

use crate::db::{open_db, open_db_in_memory};
use crate::model::preference::UserPreference;
use crate::model::task::{NewTask, Task, TaskId, TaskStatus};
use crate::model::OwnerId;
use crate::repo::task_store::{StoreError, StoreResult, TaskStore};
use rusqlite::{params, Connection, ErrorCode, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    owner,
    description,
    status,
    created_at
FROM tasks";

const PREFERENCE_SELECT_SQL: &str = "SELECT
    id,
    owner,
    reminders_enabled
FROM user_preferences";

pub struct SqliteTaskStore {
    conn: Mutex<Connection>,
}

impl SqliteTaskStore {
    /// Wraps a migrated/ready connection, as returned by `db::open_db`.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Opens (or creates) a database file and wraps it.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))
    }
}

impl TaskStore for SqliteTaskStore {
    fn create_task(&self, task: &NewTask) -> StoreResult<Task> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO tasks (owner, description, status, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                task.owner,
                task.description.as_str(),
                task.status.as_str(),
                task.created_at,
            ],
        )?;

        Ok(task.clone().into_task(conn.last_insert_rowid()))
    }

    fn find_task_by_id_and_owner(&self, id: TaskId, owner: OwnerId) -> StoreResult<Option<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE id = ?1 AND owner = ?2;"
        ))?;

        let mut rows = stmt.query(params![id, owner])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_task_row(row)?));
        }

        Ok(None)
    }

    fn list_tasks_by_owner(&self, owner: OwnerId) -> StoreResult<Vec<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE owner = ?1
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query(params![owner])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn save_task(&self, task: &Task) -> StoreResult<()> {
        let changed = self.conn()?.execute(
            "UPDATE tasks
             SET
                description = ?1,
                status = ?2
             WHERE id = ?3 AND owner = ?4;",
            params![
                task.description.as_str(),
                task.status.as_str(),
                task.id,
                task.owner,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    fn delete_task_by_id_and_owner(&self, id: TaskId, owner: OwnerId) -> StoreResult<usize> {
        let changed = self.conn()?.execute(
            "DELETE FROM tasks WHERE id = ?1 AND owner = ?2;",
            params![id, owner],
        )?;
        Ok(changed)
    }

    fn find_tasks_by_status_older_than(
        &self,
        status: TaskStatus,
        cutoff_epoch_ms: i64,
    ) -> StoreResult<Vec<Task>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{TASK_SELECT_SQL}
             WHERE status = ?1 AND created_at <= ?2
             ORDER BY id ASC;"
        ))?;

        let mut rows = stmt.query(params![status.as_str(), cutoff_epoch_ms])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }

        Ok(tasks)
    }

    fn get_preference_by_owner(&self, owner: OwnerId) -> StoreResult<Option<UserPreference>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{PREFERENCE_SELECT_SQL}
             WHERE owner = ?1;"
        ))?;

        let mut rows = stmt.query(params![owner])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_preference_row(row)?));
        }

        Ok(None)
    }

    fn create_preference(
        &self,
        owner: OwnerId,
        reminders_enabled: bool,
    ) -> StoreResult<UserPreference> {
        let conn = self.conn()?;
        let inserted = conn.execute(
            "INSERT INTO user_preferences (owner, reminders_enabled) VALUES (?1, ?2);",
            params![owner, bool_to_int(reminders_enabled)],
        );

        match inserted {
            Ok(_) => Ok(UserPreference {
                id: conn.last_insert_rowid(),
                owner,
                reminders_enabled,
            }),
            Err(err) if is_unique_violation(&err) => Err(StoreError::Conflict(format!(
                "preference for owner {owner} already exists"
            ))),
            Err(err) => Err(err.into()),
        }
    }

    fn save_preference(&self, preference: &UserPreference) -> StoreResult<()> {
        let changed = self.conn()?.execute(
            "UPDATE user_preferences
             SET reminders_enabled = ?1
             WHERE id = ?2 AND owner = ?3;",
            params![
                bool_to_int(preference.reminders_enabled),
                preference.id,
                preference.owner,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    let status_text: String = row.get("status")?;
    let status = status_text.parse::<TaskStatus>().map_err(|_| {
        StoreError::InvalidData(format!("invalid task status `{status_text}` in tasks.status"))
    })?;

    Ok(Task {
        id: row.get("id")?,
        owner: row.get("owner")?,
        description: row.get("description")?,
        status,
        created_at: row.get("created_at")?,
    })
}

fn parse_preference_row(row: &Row<'_>) -> StoreResult<UserPreference> {
    let reminders_enabled = match row.get::<_, i64>("reminders_enabled")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid reminders_enabled value `{other}` in user_preferences.reminders_enabled"
            )));
        }
    };

    Ok(UserPreference {
        id: row.get("id")?,
        owner: row.get("owner")?,
        reminders_enabled,
    })
}

/// Only UNIQUE/PRIMARY KEY failures count; CHECK and NOT NULL stay backend errors.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && matches!(
                    failure.extended_code,
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                )
    )
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{is_unique_violation, SqliteTaskStore};
    use crate::db::open_db_in_memory;
    use crate::repo::task_store::{StoreError, TaskStore};

    #[test]
    fn duplicate_owner_is_a_unique_violation() {
        let conn = open_db_in_memory().unwrap();
        conn.execute(
            "INSERT INTO user_preferences (owner, reminders_enabled) VALUES (7, 1);",
            [],
        )
        .unwrap();
        let err = conn
            .execute(
                "INSERT INTO user_preferences (owner, reminders_enabled) VALUES (7, 0);",
                [],
            )
            .unwrap_err();
        assert!(is_unique_violation(&err));
    }

    #[test]
    fn check_and_not_null_failures_are_not_unique_violations() {
        let conn = open_db_in_memory().unwrap();
        let check = conn
            .execute(
                "INSERT INTO user_preferences (owner, reminders_enabled) VALUES (8, 5);",
                [],
            )
            .unwrap_err();
        assert!(!is_unique_violation(&check));

        let not_null = conn
            .execute(
                "INSERT INTO tasks (owner, description, status, created_at)
                 VALUES (8, NULL, 'Pending', 0);",
                [],
            )
            .unwrap_err();
        assert!(!is_unique_violation(&not_null));
    }

    #[test]
    fn second_preference_for_owner_is_conflict() {
        let store = SqliteTaskStore::open_in_memory().unwrap();
        store.create_preference(9, true).unwrap();
        let err = store.create_preference(9, false).unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
