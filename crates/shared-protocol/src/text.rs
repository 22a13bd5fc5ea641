//! User-facing texts attached to replies and shown by the password prompt.
//!
//! Translation lives outside the bridge; hosts that localise pass their own
//! [`BridgeText`] (it deserializes, so a translated set can ship as config).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeText {
    pub no_key: String,
    pub no_active_identity: String,
    pub sign_empty: String,
    pub busy: String,
    pub invalid_password: String,
    pub unknown_error: String,
    pub cancelled: String,
    pub abandoned: String,
    pub password_title: String,
    pub password_message: String,
    pub password_placeholder: String,
    pub confirm: String,
    pub signing: String,
}

impl Default for BridgeText {
    fn default() -> Self {
        Self {
            no_key: "The active identity has no public key.".into(),
            no_active_identity: "No identity is selected.".into(),
            sign_empty: "Nothing to sign.".into(),
            busy: "Another signing request is in progress.".into(),
            invalid_password: "Incorrect password, please try again.".into(),
            unknown_error: "Signing failed.".into(),
            cancelled: "Cancelled".into(),
            abandoned: "Sign request abandoned".into(),
            password_title: "Enter password".into(),
            password_message: "An embedded page is requesting your signature.".into(),
            password_placeholder: "Password of the active identity".into(),
            confirm: "Confirm".into(),
            signing: "Signing...".into(),
        }
    }
}
