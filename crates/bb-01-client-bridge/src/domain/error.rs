//! Client-side errors.
//!
//! Protocol failures (unknown action, busy, cancelled, ...) are *replies* and
//! arrive as `Ok` payloads. Only local conditions surface as [`ClientError`].

use shared_medium::MediumError;
use shared_protocol::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// No reply within the action's timeout
    #[error("bridge request timed out: {action}")]
    Timeout { action: String },

    /// The request could not be posted
    #[error("failed to post request: {0}")]
    Medium(#[from] MediumError),

    /// The pending entry vanished without a reply (client shut down)
    #[error("reply channel closed: {action}")]
    ReplyDropped { action: String },

    /// Reply payload is not a valid action response
    #[error("malformed reply for {action}: {reason}")]
    MalformedReply { action: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout { .. })
    }
}
