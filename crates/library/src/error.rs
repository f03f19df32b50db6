//! Error types for library aggregation.

/// Errors produced while fetching and merging custom library sources.
///
/// During aggregation these are isolated per source: a failing source is
/// logged and skipped, never aborting the whole run.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("metadata lookup error: {0}")]
    Lookup(String),
}
