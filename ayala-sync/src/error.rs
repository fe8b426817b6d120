//! Sync error types

use thiserror::Error;

/// Remote store / cache error
#[derive(Debug, Error)]
pub enum SyncError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote is unreachable (offline device, stopped backend)
    #[error("Remote unavailable: {0}")]
    Unavailable(String),

    /// Remote answered with a non-success status
    #[error("Remote rejected request ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// Event stream was closed by the remote
    #[error("Watch cancelled by remote: {0}")]
    WatchCancelled(String),

    /// Document could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local cache IO failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid remote configuration
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;
