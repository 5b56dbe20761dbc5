//! Reminder sweep: query, group, filter, dispatch.

use crate::config::ReminderConfig;
use crate::model::now_epoch_millis;
use crate::model::task::TaskStatus;
use crate::model::OwnerId;
use crate::notify::{send_with_retry, Notifier};
use crate::reminder::grouping::group_by_owner;
use crate::reminder::runner::run_periodic;
use crate::repo::task_store::{StoreResult, TaskStore};
use crate::service::preference_service::PreferenceService;
use log::{error, info};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const REMINDER_HEADER: &str = "⏰ You have pending tasks:";

/// Outcome of one sweep, per owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Correlates the sweep's log lines.
    pub sweep_id: Uuid,
    /// Stale pending tasks found by the query.
    pub stale_tasks: usize,
    /// Owners whose reminder was delivered.
    pub notified: Vec<OwnerId>,
    /// Owners skipped because reminders are disabled.
    pub disabled: Vec<OwnerId>,
    /// Owners whose preference lookup or delivery failed.
    pub failed: Vec<OwnerId>,
}

impl SweepReport {
    fn new(sweep_id: Uuid, stale_tasks: usize) -> Self {
        Self {
            sweep_id,
            stale_tasks,
            notified: Vec::new(),
            disabled: Vec::new(),
            failed: Vec::new(),
        }
    }
}

/// Periodic reminder dispatcher over a shared store and notifier.
pub struct ReminderScheduler<S: TaskStore, N: Notifier> {
    store: S,
    notifier: N,
    config: ReminderConfig,
    clock: fn() -> i64,
}

impl<S: TaskStore, N: Notifier> ReminderScheduler<S, N> {
    pub fn new(store: S, notifier: N, config: ReminderConfig) -> Self {
        Self {
            store,
            notifier,
            config,
            clock: now_epoch_millis,
        }
    }

    /// Overrides the sweep's notion of "now" (epoch milliseconds).
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    /// Runs one sweep against the current clock.
    pub async fn sweep(&self) -> StoreResult<SweepReport> {
        self.sweep_at((self.clock)()).await
    }

    /// Runs one sweep treating `now_epoch_ms` as the current time.
    ///
    /// # Errors
    /// Only a failure of the stale-task query is returned. Per-owner
    /// failures are logged and recorded in `SweepReport::failed`.
    pub async fn sweep_at(&self, now_epoch_ms: i64) -> StoreResult<SweepReport> {
        let sweep_id = Uuid::new_v4();
        let cutoff = now_epoch_ms.saturating_sub(self.config.stale_after_millis());

        let stale = self
            .store
            .find_tasks_by_status_older_than(TaskStatus::Pending, cutoff)
            .inspect_err(|err| {
                error!(
                    "event=reminder_sweep module=reminder status=error sweep_id={} error_code=stale_query_failed error={}",
                    sweep_id, err
                );
            })?;

        let mut report = SweepReport::new(sweep_id, stale.len());
        if stale.is_empty() {
            info!(
                "event=reminder_sweep module=reminder status=empty sweep_id={}",
                sweep_id
            );
            return Ok(report);
        }

        let preferences = PreferenceService::new(&self.store);
        let policy = self.config.retry_policy();

        for group in group_by_owner(&stale) {
            let owner = group.owner;
            let preference = match preferences.get_or_create(owner) {
                Ok(preference) => preference,
                Err(err) => {
                    error!(
                        "event=reminder_owner module=reminder status=error sweep_id={} owner={} error_code=preference_failed error={}",
                        sweep_id, owner, err
                    );
                    report.failed.push(owner);
                    continue;
                }
            };

            if !preference.reminders_enabled {
                info!(
                    "event=reminder_owner module=reminder status=disabled sweep_id={} owner={}",
                    sweep_id, owner
                );
                report.disabled.push(owner);
                continue;
            }

            let message = compose_reminder(&group.descriptions);
            match send_with_retry(&self.notifier, owner, &message, policy).await {
                Ok(()) => {
                    info!(
                        "event=reminder_owner module=reminder status=ok sweep_id={} owner={} tasks={}",
                        sweep_id,
                        owner,
                        group.descriptions.len()
                    );
                    report.notified.push(owner);
                }
                Err(err) => {
                    error!(
                        "event=reminder_owner module=reminder status=error sweep_id={} owner={} error_code=delivery_failed error={}",
                        sweep_id, owner, err
                    );
                    report.failed.push(owner);
                }
            }
        }

        info!(
            "event=reminder_sweep module=reminder status=ok sweep_id={} stale_tasks={} notified={} disabled={} failed={}",
            sweep_id,
            report.stale_tasks,
            report.notified.len(),
            report.disabled.len(),
            report.failed.len()
        );
        Ok(report)
    }

    /// Sweeps on `config.sweep_interval()` until `cancel` fires.
    ///
    /// Returns the number of sweeps started. A failed sweep is logged and the
    /// loop keeps its schedule.
    pub async fn run(self, cancel: CancellationToken) -> u64 {
        let interval = self.config.sweep_interval();
        let this = &self;
        run_periodic("reminder", interval, cancel, move || async move {
            // Query failures are already logged inside the sweep.
            let _ = this.sweep().await;
        })
        .await
    }
}

/// Formats one consolidated reminder for an owner's stale tasks.
pub fn compose_reminder(descriptions: &[String]) -> String {
    format!("{REMINDER_HEADER}\n- {}", descriptions.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::compose_reminder;

    #[test]
    fn reminder_lists_each_description_on_its_own_line() {
        let message = compose_reminder(&["Buy milk".to_string(), "Call mom".to_string()]);
        assert_eq!(message, "⏰ You have pending tasks:\n- Buy milk\n- Call mom");
    }
}
