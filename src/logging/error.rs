use std::path::PathBuf;
use thiserror::Error;

/// Errors returned from a logging call
#[derive(Debug, Error)]
pub enum LogError {
    /// The raw event buffer could not be (de)serialized
    #[error("malformed log event: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The event was not a JSON object
    #[error("malformed log event: expected a JSON object")]
    NotAnObject,

    /// The persistent sink could not insert the row
    #[error("failed to write log to database: {0}")]
    Persist(#[source] sqlx::Error),

    /// Console or file write failed
    #[error("{sink} sink write failed: {source}")]
    Io {
        sink: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The dated log file (or its directory) could not be opened
    #[error("failed to open log file {}: {source}", path.display())]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
