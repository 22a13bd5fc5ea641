//! # Shared Protocol - Wire Contract for the Frame Bridge
//!
//! Everything that crosses the messaging medium between an embedded frame and
//! its host is defined here, so both sides agree on one vocabulary.
//!
//! ## Message Shapes
//!
//! ```text
//! Request:  { channel: "<base>",        id, action, payload }
//! Response: { channel: "<base>-result", id, payload: { code, message?, data? } }
//! ```
//!
//! ## Modules
//!
//! - [`envelope`]: request/response envelopes and channel tags
//! - [`codes`]: closed [`ErrorCode`] taxonomy
//! - [`actions`]: decoded [`BridgeAction`] and action payload helpers
//! - [`response`]: [`ActionResponse`] and typed success data
//! - [`config`]: [`BridgeConfig`] with timeout policy
//! - [`text`]: user-facing messages attached to error replies

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod actions;
pub mod codes;
pub mod config;
pub mod envelope;
pub mod response;
pub mod text;

pub use actions::{BridgeAction, SignRequestPayload};
pub use codes::ErrorCode;
pub use config::{BridgeConfig, ConfigError, TimeoutConfig};
pub use envelope::{ChannelName, RequestEnvelope, ResponseEnvelope};
pub use response::{ActionResponse, PublicKeyData, SignatureData, VersionData};
pub use text::BridgeText;

/// Protocol version reported by the `getVersion` action.
pub const PROTOCOL_VERSION: &str = "1.0.0";

/// Default base channel name shared by frame and host.
pub const DEFAULT_CHANNEL: &str = "bucky-api";
