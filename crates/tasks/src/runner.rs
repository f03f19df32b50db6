//! Sequential task list runner.
//!
//! Executes a game's ordered task list against its game folder, one task
//! at a time. The first failure aborts the remainder and propagates the
//! error unchanged; already-applied tasks are not rolled back.

use std::path::Path;

use gamedock_schema::Task;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::download::run_download_task;
use crate::error::TaskError;
use crate::extract::run_extract_task;
use crate::progress::{EventSender, InstallEvent};
use crate::run::{WineRunner, run_executable_task};

/// Everything a task list needs to know about the game it belongs to.
pub struct InstallContext<'a> {
    /// Namespaced app identifier, carried into progress events.
    pub app_id: &'a str,
    pub game_folder: &'a Path,
    /// Whether run tasks may spawn natively on this host.
    pub native: bool,
    pub wine: &'a dyn WineRunner,
}

/// Runs install/uninstall task lists.
pub struct TaskRunner {
    http: reqwest::Client,
    cancel: CancellationToken,
}

impl TaskRunner {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            cancel: CancellationToken::new(),
        }
    }

    /// Returns a token that stops the list between tasks.
    ///
    /// Cancellation is checked only at task boundaries; an in-flight
    /// child process is never killed.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Executes `tasks` strictly in order.
    ///
    /// Creates the game folder if needed. Emits a lifecycle event per
    /// task; on failure the error is returned unchanged after a
    /// [`InstallEvent::TaskFailed`] event.
    pub async fn run_list(
        &self,
        ctx: &InstallContext<'_>,
        tasks: &[Task],
        events: &EventSender,
    ) -> Result<(), TaskError> {
        tokio::fs::create_dir_all(ctx.game_folder).await?;

        for (index, task) in tasks.iter().enumerate() {
            if self.cancel.is_cancelled() {
                return Err(TaskError::Cancelled);
            }

            let _ = events
                .send(InstallEvent::TaskStarted {
                    app_id: ctx.app_id.to_string(),
                    index,
                    label: task.label(),
                })
                .await;

            let result = match task {
                Task::Download {
                    url,
                    filename,
                    destination,
                } => run_download_task(
                    &self.http,
                    ctx.game_folder,
                    url,
                    filename.as_deref(),
                    destination.as_deref(),
                    ctx.app_id,
                    events,
                )
                .await
                .map(|_| ()),
                Task::Extract {
                    source,
                    destination,
                } => run_extract_task(ctx.game_folder, source, destination.as_deref())
                    .await
                    .map(|_| ()),
                Task::Run { executable, args } => {
                    run_executable_task(ctx.game_folder, executable, args, ctx.native, ctx.wine)
                        .await
                }
            };

            match result {
                Ok(()) => {
                    info!(app = ctx.app_id, index, task = %task.label(), "task finished");
                    let _ = events
                        .send(InstallEvent::TaskFinished {
                            app_id: ctx.app_id.to_string(),
                            index,
                        })
                        .await;
                }
                Err(e) => {
                    error!(app = ctx.app_id, index, task = %task.label(), error = %e, "task failed");
                    let _ = events
                        .send(InstallEvent::TaskFailed {
                            app_id: ctx.app_id.to_string(),
                            index,
                            error: e.to_string(),
                        })
                        .await;
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}
