//! Error types for the printer library

use thiserror::Error;

/// Printer error types
#[derive(Debug, Error)]
pub enum PrintError {
    /// The print surface refused to open (e.g., blocked preview window).
    /// Recoverable: the operator can retry or cancel.
    #[error("Print surface blocked: {0}")]
    Blocked(String),

    /// IO error during printing
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PrintError {
    /// Whether the same document can simply be sent again
    pub fn is_retryable(&self) -> bool {
        matches!(self, PrintError::Blocked(_))
    }
}

/// Result type for printer operations
pub type PrintResult<T> = Result<T, PrintError>;
