//! Persistence and handoff errors

use thiserror::Error;

/// Pending-entity storage errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Invalid session key: {0}")]
    InvalidKey(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Cross-context handoff errors
#[derive(Error, Debug)]
pub enum HandoffError {
    #[error("Prefill parameter is not valid base64: {0}")]
    InvalidBase64(String),

    #[error("Handoff payload is not a valid entity record: {0}")]
    InvalidPayload(String),

    #[error("Unrecognized handoff message: {0}")]
    UnknownMessage(String),

    #[error("Origin not allowed: {0}")]
    OriginNotAllowed(String),
}

impl From<PersistenceError> for loan_autofill_core::Error {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::InvalidKey(key) => {
                loan_autofill_core::Error::MalformedRequest(format!("invalid session key: {}", key))
            }
            other => loan_autofill_core::Error::Storage(other.to_string()),
        }
    }
}

impl From<HandoffError> for loan_autofill_core::Error {
    fn from(err: HandoffError) -> Self {
        loan_autofill_core::Error::Handoff(err.to_string())
    }
}
