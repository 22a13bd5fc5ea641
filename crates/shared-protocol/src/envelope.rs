//! # Message Envelopes
//!
//! Wire shape of every message on the bridge. A reply's channel tag is always
//! the request's tag plus [`RESULT_SUFFIX`], so several protocols with
//! different base names can share one medium without collision.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::DEFAULT_CHANNEL;

/// Suffix appended to the base channel name for replies.
pub const RESULT_SUFFIX: &str = "-result";

/// Base channel name identifying this protocol on the medium.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelName(String);

impl ChannelName {
    /// Create a channel from its base name.
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into())
    }

    /// Tag carried by requests (the base name itself).
    pub fn request_tag(&self) -> &str {
        &self.0
    }

    /// Tag carried by replies.
    pub fn result_tag(&self) -> String {
        format!("{}{}", self.0, RESULT_SUFFIX)
    }

    /// Whether `tag` is this channel's reply tag.
    pub fn is_result_tag(&self, tag: &str) -> bool {
        tag.strip_suffix(RESULT_SUFFIX) == Some(self.0.as_str())
    }
}

impl Default for ChannelName {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL)
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelName {
    fn from(base: &str) -> Self {
        Self::new(base)
    }
}

/// Request sent from the frame to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Base channel tag
    pub channel: String,
    /// Correlation id, opaque to the host
    pub id: String,
    /// Requested capability
    pub action: String,
    /// Action-specific payload
    #[serde(default = "empty_object")]
    pub payload: Value,
}

impl RequestEnvelope {
    pub fn new(
        channel: &ChannelName,
        id: impl Into<String>,
        action: impl Into<String>,
        payload: Value,
    ) -> Self {
        Self {
            channel: channel.request_tag().to_string(),
            id: id.into(),
            action: action.into(),
            payload,
        }
    }

    /// Extract a request for `channel` from raw medium traffic.
    ///
    /// Returns `None` for anything that is not a request on this channel:
    /// non-objects, other channel tags, or a missing/non-string `id` or
    /// `action`. A missing or `null` payload becomes `{}`.
    pub fn from_message(data: &Value, channel: &ChannelName) -> Option<Self> {
        let obj = data.as_object()?;
        if obj.get("channel").and_then(Value::as_str) != Some(channel.request_tag()) {
            return None;
        }
        let action = obj.get("action")?.as_str()?;
        let id = obj.get("id")?.as_str()?;
        let payload = match obj.get("payload") {
            None | Some(Value::Null) => empty_object(),
            Some(payload) => payload.clone(),
        };

        Some(Self {
            channel: channel.request_tag().to_string(),
            id: id.to_string(),
            action: action.to_string(),
            payload,
        })
    }

    /// Render as a JSON value for posting on the medium.
    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(4);
        map.insert("channel".into(), Value::String(self.channel.clone()));
        map.insert("id".into(), Value::String(self.id.clone()));
        map.insert("action".into(), Value::String(self.action.clone()));
        map.insert("payload".into(), self.payload.clone());
        Value::Object(map)
    }
}

/// Reply sent from the host back to the frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    /// Result channel tag (`<base>-result`)
    pub channel: String,
    /// Id copied from the request
    pub id: String,
    /// Handler result
    #[serde(default)]
    pub payload: Value,
}

impl ResponseEnvelope {
    /// Build the reply for `request`, keeping its id unchanged.
    pub fn reply_to(request: &RequestEnvelope, payload: Value) -> Self {
        Self {
            channel: format!("{}{}", request.channel, RESULT_SUFFIX),
            id: request.id.clone(),
            payload,
        }
    }

    /// Extract a reply for `channel` from raw medium traffic.
    pub fn from_message(data: &Value, channel: &ChannelName) -> Option<Self> {
        let obj = data.as_object()?;
        let tag = obj.get("channel")?.as_str()?;
        if !channel.is_result_tag(tag) {
            return None;
        }
        let id = obj.get("id")?.as_str()?;

        Some(Self {
            channel: tag.to_string(),
            id: id.to_string(),
            payload: obj.get("payload").cloned().unwrap_or(Value::Null),
        })
    }

    pub fn to_value(&self) -> Value {
        let mut map = Map::with_capacity(3);
        map.insert("channel".into(), Value::String(self.channel.clone()));
        map.insert("id".into(), Value::String(self.id.clone()));
        map.insert("payload".into(), self.payload.clone());
        Value::Object(map)
    }
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
