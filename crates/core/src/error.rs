//! Error types shared across the autofill crates

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// The transcript payload could not be parsed at all
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// Pending-entity storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),

    /// A cross-context handoff payload was unusable
    #[error("Handoff error: {0}")]
    Handoff(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether the caller (not the server) is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::MalformedRequest(_) | Error::Handoff(_))
    }
}

/// Result alias using the core error
pub type Result<T> = std::result::Result<T, Error>;
