//! Error types for task execution.

/// Errors produced while executing install/uninstall tasks.
///
/// Missing-resource and unsupported-format variants fail fast before any
/// side effect; process variants embed the exit code and captured stderr.
/// Nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source file not found: {0}")]
    SourceMissing(String),

    #[error("executable not found: {0}")]
    ExecutableMissing(String),

    #[error("unsupported archive format: {0}")]
    UnsupportedArchive(String),

    #[error("could not determine a filename for {0}")]
    NoFilename(String),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exited with code {code}: {stderr}")]
    ProcessFailed {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("download of {url} failed: {reason}")]
    Download { url: String, reason: String },

    #[error("download of {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("task list cancelled")]
    Cancelled,
}
