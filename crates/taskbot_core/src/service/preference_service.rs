//! Reminder preference service.
//!
//! # Invariants
//! - At most one preference per owner; the store's unique owner constraint
//!   decides races between concurrent first-time callers.
//! - `set_reminders` never creates records.

use crate::model::preference::{UserPreference, DEFAULT_REMINDERS_ENABLED};
use crate::model::OwnerId;
use crate::repo::task_store::{StoreError, TaskStore};
use crate::service::error::{CoreError, CoreResult, RecordKind};
use log::{debug, info};

pub struct PreferenceService<S: TaskStore> {
    store: S,
}

impl<S: TaskStore> PreferenceService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the owner's preference, creating an enabled one on first use.
    ///
    /// A lost insert race (`Conflict`) is resolved by reading back the
    /// winner's record.
    pub fn get_or_create(&self, owner: OwnerId) -> CoreResult<UserPreference> {
        if let Some(existing) = self.store.get_preference_by_owner(owner)? {
            return Ok(existing);
        }

        match self
            .store
            .create_preference(owner, DEFAULT_REMINDERS_ENABLED)
        {
            Ok(created) => {
                info!(
                    "event=preference_create module=preference_service status=ok owner={} reminders_enabled={}",
                    owner, created.reminders_enabled
                );
                Ok(created)
            }
            Err(StoreError::Conflict(_)) => {
                debug!(
                    "event=preference_create module=preference_service status=conflict owner={}",
                    owner
                );
                self.store
                    .get_preference_by_owner(owner)?
                    .ok_or(CoreError::NotFound(RecordKind::Preference))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Enables or disables reminders for an owner that already has a record.
    ///
    /// # Errors
    /// - `NotFound` when `get_or_create` was never triggered for `owner`.
    pub fn set_reminders(&self, owner: OwnerId, enabled: bool) -> CoreResult<UserPreference> {
        let mut preference = self
            .store
            .get_preference_by_owner(owner)?
            .ok_or(CoreError::NotFound(RecordKind::Preference))?;
        preference.reminders_enabled = enabled;
        self.store
            .save_preference(&preference)
            .map_err(|err| CoreError::from_store(RecordKind::Preference, err))?;
        info!(
            "event=preference_update module=preference_service status=ok owner={} reminders_enabled={}",
            owner, enabled
        );
        Ok(preference)
    }
}
