//! # Sign Request State
//!
//! ```text
//!        sign(messages)             confirm()
//! Idle ─────────────────→ AwaitingPassword ─────────→ Verifying
//!  ▲                        ▲      │ cancel()             │
//!  │                        │      ▼                      │
//!  │                        │     Idle                    │
//!  │                        └──── invalid password ───────┤
//!  └────────────────────── success / other failure ───────┘
//! ```

use serde::Serialize;
use std::fmt;

/// Phase of the per-binding sign workflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum SignPhase {
    #[default]
    Idle,
    /// Prompt open, waiting for the user
    AwaitingPassword,
    /// Prompt open, backend checking the password
    Verifying,
}

/// Snapshot published to the presentation layer on every transition.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SignRequestState {
    pub phase: SignPhase,
    /// Current password input
    pub password: String,
    /// Inline error shown in the prompt
    pub error: Option<String>,
    /// Messages queued for signing
    pub messages: Vec<String>,
    /// Identity whose key will sign
    pub identity: Option<String>,
}

impl SignRequestState {
    pub(crate) fn awaiting(messages: Vec<String>, identity: String) -> Self {
        Self {
            phase: SignPhase::AwaitingPassword,
            password: String::new(),
            error: None,
            messages,
            identity: Some(identity),
        }
    }

    /// Prompt is visible.
    pub fn is_open(&self) -> bool {
        self.phase != SignPhase::Idle
    }

    /// Backend call in flight; confirm and cancel are disabled.
    pub fn is_loading(&self) -> bool {
        self.phase == SignPhase::Verifying
    }
}

impl fmt::Debug for SignRequestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignRequestState")
            .field("phase", &self.phase)
            .field("password", &"<redacted>")
            .field("error", &self.error)
            .field("messages", &self.messages.len())
            .field("identity", &self.identity)
            .finish()
    }
}
