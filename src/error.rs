//! Error types for the loggers shipped with this crate.

use thiserror::Error;

/// Failure reported by a [`KvLogger`](crate::logger::KvLogger).
///
/// The interceptor adapter never surfaces these; they are only visible
/// when a logger is called directly.
#[derive(Debug, Error)]
pub enum LogError {
    /// Writing the line to the underlying writer failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A field value could not be encoded
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Another thread panicked while holding the writer lock
    #[error("logger lock poisoned")]
    Poisoned,
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, LogError>;
