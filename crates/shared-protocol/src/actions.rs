//! # Actions
//!
//! Action names arrive as strings and are decoded once at the protocol
//! boundary into a closed [`BridgeAction`]. Names nobody recognises are kept in
//! [`BridgeAction::Unknown`] so hosts can still register extension handlers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

pub const GET_PUBLIC_KEY: &str = "getPublicKey";
pub const SIGN_WITH_ACTIVE_IDENTITY: &str = "signWithActiveIdentity";
pub const GET_VERSION: &str = "getVersion";

/// Older frames still send this name for the sign action.
pub const LEGACY_SIGN_WITH_ACTIVE_DID: &str = "signWithActiveDid";

/// Capability requested by a frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BridgeAction {
    GetPublicKey,
    SignWithActiveIdentity,
    GetVersion,
    Unknown(String),
}

impl BridgeAction {
    /// Decode an action name from the wire.
    pub fn from_name(name: &str) -> Self {
        match name {
            GET_PUBLIC_KEY => BridgeAction::GetPublicKey,
            SIGN_WITH_ACTIVE_IDENTITY | LEGACY_SIGN_WITH_ACTIVE_DID => {
                BridgeAction::SignWithActiveIdentity
            }
            GET_VERSION => BridgeAction::GetVersion,
            other => BridgeAction::Unknown(other.to_string()),
        }
    }

    /// Canonical wire name.
    pub fn name(&self) -> &str {
        match self {
            BridgeAction::GetPublicKey => GET_PUBLIC_KEY,
            BridgeAction::SignWithActiveIdentity => SIGN_WITH_ACTIVE_IDENTITY,
            BridgeAction::GetVersion => GET_VERSION,
            BridgeAction::Unknown(name) => name,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, BridgeAction::Unknown(_))
    }
}

impl From<&str> for BridgeAction {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl fmt::Display for BridgeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for BridgeAction {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for BridgeAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(BridgeAction::from_name(&name))
    }
}

/// Messages to sign, extracted from a `signWithActiveIdentity` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignRequestPayload {
    pub messages: Vec<String>,
}

impl SignRequestPayload {
    /// Read the batch from an arbitrary payload.
    ///
    /// Accepts `{ messages: [..] }` and the single-string `{ message: ".." }`
    /// form. Non-string entries and blank strings are dropped.
    pub fn from_payload(payload: &Value) -> Self {
        let messages = match (payload.get("messages"), payload.get("message")) {
            (Some(Value::Array(items)), _) => items
                .iter()
                .filter_map(Value::as_str)
                .filter(|item| !item.trim().is_empty())
                .map(str::to_string)
                .collect(),
            (_, Some(Value::String(single))) if !single.trim().is_empty() => {
                vec![single.clone()]
            }
            _ => Vec::new(),
        };
        Self { messages }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
