//! Console front-end for the task tracker.
//!
//! # Responsibility
//! - Load process config, start logging and open the SQLite store.
//! - Run the reminder scheduler next to a stdin command loop.
//! - Stop both on Ctrl-C.

mod command;
mod config;
mod console;
mod handler;

use config::AppConfig;
use console::ConsoleNotifier;
use handler::CommandHandler;
use log::{error, info, warn};
use std::process::ExitCode;
use std::sync::Arc;
use taskbot_core::{
    default_log_level, init_logging, send_with_retry, LogTarget, Notifier, OwnerId,
    ReminderScheduler, RetryPolicy, SqliteTaskStore, TaskStore,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("taskbot: invalid configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = start_logging(&config) {
        eprintln!("taskbot: {err}");
        return ExitCode::FAILURE;
    }

    let store = match SqliteTaskStore::open(&config.db_path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            error!(
                "event=bot_start module=cli status=error path={} error={}",
                config.db_path.display(),
                err
            );
            eprintln!("taskbot: failed to open database: {err}");
            return ExitCode::FAILURE;
        }
    };
    let notifier = Arc::new(ConsoleNotifier::stdout());
    let cancel = CancellationToken::new();

    let scheduler = ReminderScheduler::new(
        Arc::clone(&store),
        Arc::clone(&notifier),
        config.reminders.clone(),
    );
    let reminders = tokio::spawn(scheduler.run(cancel.child_token()));

    info!(
        "event=bot_start module=cli status=ok owner={} db_path={}",
        config.owner,
        config.db_path.display()
    );

    let handler = CommandHandler::new(Arc::clone(&store));
    let policy = config.reminders.retry_policy();
    run_command_loop(&handler, notifier.as_ref(), config.owner, policy).await;

    cancel.cancel();
    match reminders.await {
        Ok(sweeps) => info!("event=bot_stop module=cli status=ok sweeps={}", sweeps),
        Err(err) => error!("event=bot_stop module=cli status=error error={}", err),
    }
    ExitCode::SUCCESS
}

fn start_logging(config: &AppConfig) -> Result<(), String> {
    let level = config.log_level.as_deref().unwrap_or(default_log_level());
    let target = match config.log_dir.as_deref() {
        Some(dir) => LogTarget::directory(dir)?,
        None => LogTarget::Stderr,
    };
    init_logging(level, target)
}

/// Reads commands until Ctrl-C. After stdin closes, reminders keep running
/// until Ctrl-C arrives.
async fn run_command_loop<S: TaskStore, N: Notifier + ?Sized>(
    handler: &CommandHandler<S>,
    notifier: &N,
    owner: OwnerId,
    policy: RetryPolicy,
) {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("event=bot_shutdown module=cli status=ok reason=ctrl_c");
                return;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => {
                    let reply = handler.handle(owner, &line);
                    if let Err(err) = send_with_retry(notifier, owner, &reply, policy).await {
                        warn!(
                            "event=reply module=cli status=error owner={} error={}",
                            owner, err
                        );
                    }
                }
                Ok(None) => {
                    info!("event=stdin_closed module=cli status=ok");
                    break;
                }
                Err(err) => {
                    error!("event=stdin_read module=cli status=error error={}", err);
                    break;
                }
            }
        }
    }

    let _ = shutdown.await;
    info!("event=bot_shutdown module=cli status=ok reason=ctrl_c");
}
