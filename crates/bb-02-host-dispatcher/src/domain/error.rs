//! Errors a handler may return. Every variant becomes a `NativeError` reply
//! whose message is the error's display text.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandlerError {
    /// Failure reported by the host's own machinery
    #[error("{0}")]
    Native(String),

    /// Payload did not have the shape the handler needs
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl HandlerError {
    pub fn native(message: impl Into<String>) -> Self {
        HandlerError::Native(message.into())
    }
}
