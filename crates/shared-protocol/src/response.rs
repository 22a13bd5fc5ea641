//! # Action Responses
//!
//! Payload placed inside every reply envelope for actions routed through the
//! bridge: `{ code, message?, data? }`.

use crate::codes::ErrorCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Structured result of an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub code: ErrorCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ActionResponse {
    /// Successful result carrying `data`.
    pub fn success(data: Value) -> Self {
        Self {
            code: ErrorCode::Success,
            message: None,
            data: Some(data),
        }
    }

    /// Failed result with a human-readable message.
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: Some(message.into()),
            data: None,
        }
    }

    pub fn unknown_action(action: &str) -> Self {
        Self::error(ErrorCode::UnknownAction, format!("Unknown action: {}", action))
    }

    pub fn native_error(message: impl Into<String>) -> Self {
        Self::error(ErrorCode::NativeError, message)
    }

    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Decode `data` into a typed value, if present.
    pub fn data_as<T: DeserializeOwned>(&self) -> Result<Option<T>, serde_json::Error> {
        self.data
            .as_ref()
            .map(|data| serde_json::from_value(data.clone()))
            .transpose()
    }

    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Render as the reply payload.
    pub fn into_value(self) -> Value {
        let mut map = Map::with_capacity(3);
        map.insert("code".into(), Value::from(self.code.as_u32()));
        if let Some(message) = self.message {
            map.insert("message".into(), Value::String(message));
        }
        if let Some(data) = self.data {
            map.insert("data".into(), data);
        }
        Value::Object(map)
    }
}

/// `getPublicKey` success data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyData {
    /// Public key, JSON-serialized
    pub key: String,
}

/// `signWithActiveIdentity` success data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureData {
    /// One signature per requested message, same order
    pub signatures: Vec<String>,
}

/// `getVersion` success data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionData {
    pub version: String,
}
