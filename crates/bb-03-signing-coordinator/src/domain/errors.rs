//! Errors for operations the prompt side drives.
//!
//! Outcomes reported to the frame are [`ActionResponse`](shared_protocol::ActionResponse)
//! values, not errors. These only tell a presenter its input was not accepted.

use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CoordinatorError {
    /// No sign request is waiting for a password
    #[error("no sign request is awaiting a password")]
    NoPrompt,

    /// The backend is still verifying the last password
    #[error("sign request is being verified")]
    Loading,
}
