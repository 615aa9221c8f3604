//! Error types for pagewal
//!
//! Provides a unified error type for all log operations. Reaching the end of
//! the log is not an error: readers report it as `Ok(None)`.

use thiserror::Error;

/// Result type alias using WalError
pub type Result<T> = std::result::Result<T, WalError>;

/// Unified error type for pagewal operations
#[derive(Debug, Error)]
pub enum WalError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("record size {size} exceeds limit {limit}")]
    RecordTooLarge { size: usize, limit: usize },

    #[error("WAL corruption detected: {0}")]
    Corruption(String),
}

impl WalError {
    /// Whether this error indicates damaged on-disk data (or a reader opened
    /// with sizes that differ from the writer's).
    pub fn is_corruption(&self) -> bool {
        matches!(self, WalError::Corruption(_))
    }
}
