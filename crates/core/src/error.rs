//! Error types for the document store
//!
//! Reads in this system are lenient and never surface these errors; they are
//! produced by writes, by configuration loading, and by programming mistakes
//! such as naming a collection that does not exist.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use std::io;
use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the document store
#[derive(Debug, Error)]
pub enum Error {
    /// Collection name outside the fixed allow-list (programming error)
    #[error("Unsupported collection '{0}': the local store supports games, assistants, homework")]
    UnsupportedCollection(String),

    /// Document id that cannot be used as a key or file name
    #[error("Invalid document id '{id}': {reason}")]
    InvalidId {
        /// The rejected id
        id: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// I/O error while writing
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Serialization error while encoding a document or index
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Store configuration could not be read, parsed or written
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Build an `InvalidId` error
    pub fn invalid_id(id: impl Into<String>, reason: &'static str) -> Self {
        Error::InvalidId {
            id: id.into(),
            reason,
        }
    }

    /// Build a `Config` error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// True for errors caused by the caller rather than the environment
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedCollection(_) | Error::InvalidId { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}
