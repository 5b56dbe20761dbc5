//! Maps parsed commands to task and preference services.
//!
//! Replies are plain text; failures are turned into user-facing replies and
//! never propagated.

use crate::command::{split_edit_args, Command};
use log::warn;
use std::fmt::Write;
use taskbot_core::{
    CoreError, OwnerId, PreferenceService, TaskId, TaskService, TaskStatus, TaskStore,
};

pub const HELP_TEXT: &str = "Welcome to the task management bot! 🚀\n\nCommands:\n/add <task>\n/list\n/done <id>\n/delete <id>\n/edit <id> <new_description>\n/enable_reminders\n/disable_reminders";
pub const UNKNOWN_REPLY: &str = "Command not recognized. Type /start to see available commands.";

pub struct CommandHandler<S: TaskStore> {
    tasks: TaskService<S>,
    preferences: PreferenceService<S>,
}

impl<S: TaskStore + Clone> CommandHandler<S> {
    pub fn new(store: S) -> Self {
        Self {
            tasks: TaskService::new(store.clone()),
            preferences: PreferenceService::new(store),
        }
    }
}

impl<S: TaskStore> CommandHandler<S> {
    /// Handles one command line from `owner` and returns the reply text.
    pub fn handle(&self, owner: OwnerId, line: &str) -> String {
        match Command::parse(line) {
            Command::Start => HELP_TEXT.to_string(),
            Command::Add(description) => self.add(owner, &description),
            Command::List => self.list(owner),
            Command::Done(raw_id) => self.done(owner, &raw_id),
            Command::Delete(raw_id) => self.delete(owner, &raw_id),
            Command::Edit(args) => self.edit(owner, &args),
            Command::EnableReminders => self.set_reminders(owner, true),
            Command::DisableReminders => self.set_reminders(owner, false),
            Command::Unknown => UNKNOWN_REPLY.to_string(),
        }
    }

    fn add(&self, owner: OwnerId, description: &str) -> String {
        if description.trim().is_empty() {
            return "Provide a task description. Example: /add Buy groceries".to_string();
        }

        let added = self
            .preferences
            .get_or_create(owner)
            .and_then(|_| self.tasks.add(owner, description));
        match added {
            Ok(task) => format!("Task [{}] added: {}", task.id, task.description),
            Err(err) => {
                log_failure("add", owner, &err);
                "Error adding task.".to_string()
            }
        }
    }

    fn list(&self, owner: OwnerId) -> String {
        let tasks = match self.tasks.list(owner) {
            Ok(tasks) => tasks,
            Err(err) => {
                log_failure("list", owner, &err);
                return "Error retrieving tasks.".to_string();
            }
        };

        if tasks.is_empty() {
            return "No tasks found.".to_string();
        }

        let mut reply = String::from("Your tasks:\n");
        for task in &tasks {
            let _ = writeln!(reply, "[{}] {} ({})", task.id, task.description, task.status);
        }
        reply
    }

    fn done(&self, owner: OwnerId, raw_id: &str) -> String {
        let Some(id) = parse_task_id(raw_id) else {
            return "Invalid task ID.".to_string();
        };
        match self.tasks.set_status(id, owner, TaskStatus::Completed) {
            Ok(task) => format!("Task [{}] marked as {}.", task.id, task.status),
            Err(err) => error_reply("done", owner, &err),
        }
    }

    fn delete(&self, owner: OwnerId, raw_id: &str) -> String {
        let Some(id) = parse_task_id(raw_id) else {
            return "Invalid task ID.".to_string();
        };
        match self.tasks.delete(id, owner) {
            Ok(()) => format!("Task [{id}] deleted."),
            Err(err) => error_reply("delete", owner, &err),
        }
    }

    fn edit(&self, owner: OwnerId, args: &str) -> String {
        let Some((raw_id, description)) = split_edit_args(args) else {
            return "Use /edit <task_id> <new_description>".to_string();
        };
        let Some(id) = parse_task_id(raw_id) else {
            return "Invalid task ID.".to_string();
        };
        if description.trim().is_empty() {
            return "Description cannot be empty.".to_string();
        }
        match self.tasks.edit(id, owner, description) {
            Ok(task) => format!("Task [{}] updated to: {}", task.id, task.description),
            Err(err) => error_reply("edit", owner, &err),
        }
    }

    fn set_reminders(&self, owner: OwnerId, enabled: bool) -> String {
        match self.preferences.set_reminders(owner, enabled) {
            Ok(_) if enabled => "✅ Reminders enabled.".to_string(),
            Ok(_) => "❌ Reminders disabled.".to_string(),
            Err(err) => {
                log_failure("set_reminders", owner, &err);
                if enabled {
                    "Error enabling reminders.".to_string()
                } else {
                    "Error disabling reminders.".to_string()
                }
            }
        }
    }
}

/// Task ids are positive 32-bit numbers on the chat surface.
fn parse_task_id(raw: &str) -> Option<TaskId> {
    raw.trim().parse::<u32>().ok().map(TaskId::from)
}

fn error_reply(command: &str, owner: OwnerId, err: &CoreError) -> String {
    log_failure(command, owner, err);
    format!("Error: {err}")
}

fn log_failure(command: &str, owner: OwnerId, err: &CoreError) {
    warn!(
        "event=command module=handler status=error command={} owner={} error={}",
        command, owner, err
    );
}
