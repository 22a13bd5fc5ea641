//! # Signing Coordinator (BB-03)
//!
//! Password-gated signing for frame requests, one coordinator per frame
//! binding.
//!
//! ## Architecture
//!
//! - **Domain** (`domain/`): sign workflow state and prompt contents
//! - **Ports** (`ports/`): [`SigningApi`] in, [`IdentityBackend`] and
//!   [`PromptPresenter`] out
//! - **Service** (`service.rs`): [`SignCoordinator`], the state machine
//! - **Adapters** (`adapters/`): dispatcher handlers and the prompt driver
//!
//! ## Guarantees
//!
//! - At most one sign request per binding; a second one gets `Busy`.
//! - Every accepted request resolves exactly once: success, cancellation or
//!   a backend failure other than a wrong password.
//! - A wrong password reopens the prompt and leaves the caller waiting.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::handlers::{
    register_identity_actions, PublicKeyHandler, SignHandler, VersionHandler,
};
pub use adapters::prompt::drive_prompt;
pub use domain::errors::CoordinatorError;
pub use domain::prompt::{PasswordPrompt, PromptAnswer};
pub use domain::state::{SignPhase, SignRequestState};
pub use ports::inbound::{ConfirmOutcome, SigningApi};
pub use ports::outbound::{
    ActiveIdentity, BackendError, BackendErrorCode, IdentityBackend, PromptPresenter,
    INVALID_PASSWORD_MARKER,
};
pub use service::SignCoordinator;
