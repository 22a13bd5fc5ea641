//! # Host Dispatcher (BB-02)
//!
//! Runs in the host window, one binding per embedded frame. Validates inbound
//! messages, routes each request to the handler registered for its action and
//! posts exactly one reply per accepted request.
//!
//! ## Dispatch Pipeline
//!
//! ```text
//! message on host window
//!   │ source != bound frame        → drop (silent)
//!   │ not a request on channel     → drop (silent)
//!   ▼
//! BridgeAction::from_name(action)
//!   │ no handler registered        → reply { code: UnknownAction }
//!   ▼
//! spawn handler task
//!   ├── Ok(value)                  → reply value verbatim
//!   ├── Err(HandlerError)          → reply { code: NativeError, message }
//!   └── panic                      → reply { code: NativeError, message }
//! ```
//!
//! Requests are independent: handlers for different ids run concurrently and
//! may reply out of order. There is no retry and no deduplication.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod dispatcher;
pub mod domain;
pub mod ports;

pub use dispatcher::{FrameBinding, HostDispatcher};
pub use domain::error::HandlerError;
pub use domain::registry::HandlerRegistry;
pub use domain::stats::{DispatchStats, DispatchStatsSnapshot};
pub use ports::inbound::{handler_fn, ActionHandler, ActionRequest, FnHandler};
