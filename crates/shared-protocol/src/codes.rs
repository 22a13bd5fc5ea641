//! # Error Codes
//!
//! Closed taxonomy shared by frame and host so error handling never depends on
//! string matching. Values are stable across protocol versions and travel as
//! plain integers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Result code carried in every action reply payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum ErrorCode {
    /// Action completed
    Success = 0,
    /// No handler registered for the action
    UnknownAction = 1,
    /// Handler failed unexpectedly
    NativeError = 2,
    /// Active identity has no public key
    NoKey = 3,
    /// No identity is selected
    NoActiveIdentity = 4,
    /// Sign payload was empty or invalid
    NoMessage = 5,
    /// Backend rejected the password (retryable)
    InvalidPassword = 6,
    /// User dismissed the prompt
    Cancelled = 7,
    /// A sign workflow is already in progress
    Busy = 8,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 9] = [
        ErrorCode::Success,
        ErrorCode::UnknownAction,
        ErrorCode::NativeError,
        ErrorCode::NoKey,
        ErrorCode::NoActiveIdentity,
        ErrorCode::NoMessage,
        ErrorCode::InvalidPassword,
        ErrorCode::Cancelled,
        ErrorCode::Busy,
    ];

    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    pub fn from_u32(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_u32() == value)
    }

    pub const fn is_success(self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Only an invalid password can be retried by the user.
    pub const fn is_retryable(self) -> bool {
        matches!(self, ErrorCode::InvalidPassword)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ErrorCode::Success => "Success",
            ErrorCode::UnknownAction => "UnknownAction",
            ErrorCode::NativeError => "NativeError",
            ErrorCode::NoKey => "NoKey",
            ErrorCode::NoActiveIdentity => "NoActiveIdentity",
            ErrorCode::NoMessage => "NoMessage",
            ErrorCode::InvalidPassword => "InvalidPassword",
            ErrorCode::Cancelled => "Cancelled",
            ErrorCode::Busy => "Busy",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), self.as_u32())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.as_u32())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = u32::deserialize(deserializer)?;
        ErrorCode::from_u32(value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown error code: {}", value)))
    }
}
