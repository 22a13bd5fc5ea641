//! # Outbound Ports (Driven Ports / SPI)
//!
//! Collaborators the coordinator depends on: the identity backend that owns
//! the keys, and a presenter that collects passwords from the user.

use crate::domain::prompt::{PasswordPrompt, PromptAnswer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Marker some backends put in the message instead of a dedicated code.
pub const INVALID_PASSWORD_MARKER: &str = "invalid_password";

/// The identity currently selected in the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveIdentity {
    /// Identity name or DID
    pub id: String,
    /// Public key of the identity's primary wallet, if it has one
    pub public_key: Option<Value>,
}

/// Backend failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum BackendErrorCode {
    NotFound,
    InvalidPassword,
    SignMessageRequired,
    StoreUnavailable,
    VaultCorrupted,
    CryptoFailure,
    KeyDerivationFailure,
    Internal,
    Other(u32),
}

impl BackendErrorCode {
    pub const fn as_u32(self) -> u32 {
        match self {
            BackendErrorCode::NotFound => 1001,
            BackendErrorCode::InvalidPassword => 1002,
            BackendErrorCode::SignMessageRequired => 1014,
            BackendErrorCode::StoreUnavailable => 1100,
            BackendErrorCode::VaultCorrupted => 1101,
            BackendErrorCode::CryptoFailure => 1200,
            BackendErrorCode::KeyDerivationFailure => 1201,
            BackendErrorCode::Internal => 1999,
            BackendErrorCode::Other(code) => code,
        }
    }
}

impl From<u32> for BackendErrorCode {
    fn from(code: u32) -> Self {
        match code {
            1001 => BackendErrorCode::NotFound,
            1002 => BackendErrorCode::InvalidPassword,
            1014 => BackendErrorCode::SignMessageRequired,
            1100 => BackendErrorCode::StoreUnavailable,
            1101 => BackendErrorCode::VaultCorrupted,
            1200 => BackendErrorCode::CryptoFailure,
            1201 => BackendErrorCode::KeyDerivationFailure,
            1999 => BackendErrorCode::Internal,
            other => BackendErrorCode::Other(other),
        }
    }
}

impl From<BackendErrorCode> for u32 {
    fn from(code: BackendErrorCode) -> Self {
        code.as_u32()
    }
}

/// Error reported by an [`IdentityBackend`].
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[error("{message}")]
pub struct BackendError {
    pub code: BackendErrorCode,
    pub message: String,
}

impl BackendError {
    pub fn new(code: BackendErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_password() -> Self {
        Self::new(BackendErrorCode::InvalidPassword, INVALID_PASSWORD_MARKER)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(BackendErrorCode::Internal, message)
    }

    /// The user can fix this by typing another password.
    pub fn is_invalid_password(&self) -> bool {
        self.code == BackendErrorCode::InvalidPassword
            || self.message.contains(INVALID_PASSWORD_MARKER)
    }
}

/// Gateway to the host's identity store.
#[async_trait::async_trait]
pub trait IdentityBackend: Send + Sync {
    /// The identity currently selected, if any.
    async fn active_identity(&self) -> Result<Option<ActiveIdentity>, BackendError>;

    /// Sign each message with the active identity's key.
    ///
    /// Returns one signature per message, in order.
    ///
    /// # Errors
    /// * `InvalidPassword` - the password does not unlock the key
    async fn sign_with_active_identity(
        &self,
        password: &str,
        messages: &[String],
    ) -> Result<Vec<String>, BackendError>;
}

/// Password prompt UI.
#[async_trait::async_trait]
pub trait PromptPresenter: Send + Sync {
    /// Show `prompt` and wait for the user's answer.
    async fn ask_password(&self, prompt: &PasswordPrompt) -> PromptAnswer;
}
