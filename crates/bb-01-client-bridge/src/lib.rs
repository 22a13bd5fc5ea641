//! # Client Bridge (BB-01)
//!
//! Runs inside the embedded frame. Exposes one async call per host
//! capability and turns each into a correlated request on the medium.
//!
//! ## Request Lifecycle
//!
//! ```text
//! call_host(action, payload)
//!   │ 1. generate id            (RequestIdGenerator)
//!   │ 2. register pending entry (PendingRequestStore)
//!   │ 3. post envelope to parent window
//!   ▼
//! await reply ──┬── matching "<channel>-result" arrives → resolve with payload
//!               └── action timeout elapses             → ClientError::Timeout
//! ```
//!
//! Each pending entry is removed exactly once. A reply that arrives after its
//! entry timed out finds nothing and is discarded.
//!
//! ## Installation
//!
//! [`BridgeClient::install`] is idempotent per window and channel: a second
//! install returns the client already living in that window instead of
//! attaching another listener or resetting the pending table.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod client;
pub mod domain;

pub use client::BridgeClient;
pub use domain::error::ClientError;
pub use domain::pending::{HostReply, PendingRequestStore, PendingStats};
pub use domain::request_id::{RequestId, RequestIdGenerator};
