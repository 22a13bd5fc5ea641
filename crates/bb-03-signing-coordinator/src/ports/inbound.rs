//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::CoordinatorError;
use crate::domain::state::SignRequestState;
use shared_protocol::ActionResponse;
use tokio::sync::watch;

/// Result of a confirmed password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Signed; the caller received the signatures
    Signed,
    /// Rejected; prompt reopened for another attempt
    InvalidPassword,
    /// Backend failed; the caller received a `NativeError`
    Failed,
}

/// Sign workflow for one frame binding.
#[async_trait::async_trait]
pub trait SigningApi: Send + Sync {
    /// Run a sign request to completion.
    ///
    /// Resolves once the user's answer settles the request: success,
    /// cancellation or a backend failure other than a wrong password.
    async fn sign(&self, messages: Vec<String>) -> ActionResponse;

    /// Update the password input of the open prompt.
    fn set_password(&self, value: String) -> Result<(), CoordinatorError>;

    /// Submit the current password to the backend.
    async fn confirm(&self) -> Result<ConfirmOutcome, CoordinatorError>;

    /// Dismiss the open prompt. Refused while verifying.
    fn cancel(&self) -> Result<(), CoordinatorError>;

    fn state(&self) -> SignRequestState;

    fn subscribe(&self) -> watch::Receiver<SignRequestState>;
}
