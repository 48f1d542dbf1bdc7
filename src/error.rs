//! Error types for memories-store

use thiserror::Error;

/// Result type alias for memories-store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in memories-store
#[derive(Error, Debug)]
pub enum Error {
    /// A required parameter was missing or empty for the requested action.
    #[error("{0}")]
    Validation(String),

    /// Well-formed request, but no matching record. Rendered at the dispatch
    /// boundary as a plain informational message, never as a failure.
    #[error("{0}")]
    NotFound(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// A value could not be serialized for storage, or a stored blob could
    /// not be decoded back into a value.
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn unknown_action(action: impl Into<String>) -> Self {
        Self::UnknownAction(action.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
