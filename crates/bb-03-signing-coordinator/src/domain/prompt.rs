//! What a presenter shows for an open sign request.

use crate::domain::state::SignRequestState;
use shared_protocol::BridgeText;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPrompt {
    pub title: String,
    pub message: String,
    pub placeholder: String,
    pub confirm_label: String,
    /// Set after a rejected password
    pub error: Option<String>,
    pub identity: Option<String>,
    pub message_count: usize,
}

impl PasswordPrompt {
    pub fn from_state(state: &SignRequestState, text: &BridgeText) -> Self {
        let confirm_label = if state.is_loading() {
            text.signing.clone()
        } else {
            text.confirm.clone()
        };

        Self {
            title: text.password_title.clone(),
            message: text.password_message.clone(),
            placeholder: text.password_placeholder.clone(),
            confirm_label,
            error: state.error.clone(),
            identity: state.identity.clone(),
            message_count: state.messages.len(),
        }
    }
}

/// A presenter's answer to a prompt.
#[derive(Clone, PartialEq, Eq)]
pub enum PromptAnswer {
    Password(String),
    Cancel,
}

impl std::fmt::Debug for PromptAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptAnswer::Password(_) => f.write_str("Password(<redacted>)"),
            PromptAnswer::Cancel => f.write_str("Cancel"),
        }
    }
}
