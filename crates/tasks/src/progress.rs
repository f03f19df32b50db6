//! Progress events emitted during task list execution.

use tokio::sync::mpsc;

/// Event emitted while a task list runs.
///
/// Delivered over an `mpsc` channel; senders never block the pipeline on a
/// slow consumer beyond the channel capacity.
#[derive(Debug, Clone)]
pub enum InstallEvent {
    /// A task started executing.
    TaskStarted {
        app_id: String,
        index: usize,
        label: String,
    },
    /// Bytes moved during a download task.
    DownloadProgress {
        app_id: String,
        bytes: u64,
        total: Option<u64>,
        /// Percentage in `0.0..=100.0`, present when the total is known.
        percent: Option<f64>,
    },
    /// A task finished successfully.
    TaskFinished { app_id: String, index: usize },
    /// A task failed; the remainder of the list is aborted.
    TaskFailed {
        app_id: String,
        index: usize,
        error: String,
    },
}

/// Sending half of the progress channel.
pub type EventSender = mpsc::Sender<InstallEvent>;

/// Creates a progress channel with a reasonable default capacity.
pub fn event_channel() -> (EventSender, mpsc::Receiver<InstallEvent>) {
    mpsc::channel(256)
}
