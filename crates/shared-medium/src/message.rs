//! # Posted Messages
//!
//! What a listener receives: the raw JSON data plus the trusted id of the
//! window that posted it.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Identity of a window on the medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(Uuid);

impl WindowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for WindowId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A message delivered to a window.
#[derive(Debug, Clone, PartialEq)]
pub struct PostedMessage {
    /// Window that posted the message (set by the medium)
    pub source: WindowId,
    /// Message body
    pub data: Value,
}

/// Filter applied by a listener before handing messages out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    /// Only accept messages posted by this window
    pub source: Option<WindowId>,
}

impl MessageFilter {
    /// Accept everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Accept only messages posted by `source`.
    pub fn from_source(source: WindowId) -> Self {
        Self {
            source: Some(source),
        }
    }

    pub fn matches(&self, message: &PostedMessage) -> bool {
        match self.source {
            Some(source) => message.source == source,
            None => true,
        }
    }
}
