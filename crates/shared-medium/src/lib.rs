//! # Shared Medium - Window Messaging for Frames and Hosts
//!
//! Models the browser's `postMessage` medium: every participant owns a
//! window, anyone may post a JSON message to a window by id, and the receiving
//! side sees the message together with the id of the window that posted it.
//!
//! ```text
//! ┌──────────────┐   post_message(host, data)   ┌──────────────┐
//! │ Frame window │ ───────────────────────────→ │ Host window  │
//! │              │ ←─────────────────────────── │              │
//! └──────────────┘   post_message(frame, data)  └──────────────┘
//!                      (source id attached)
//! ```
//!
//! ## Semantics
//!
//! - Delivery is fire-and-forget: a window without listeners drops messages.
//! - Several protocols may share the medium; listeners filter by content.
//! - The `source` attached to a message is set by the medium, never by the
//!   sender's payload, so receivers can trust it.
//! - Each window carries a small globals table so code running "inside" the
//!   window can install itself once.

#![allow(clippy::missing_const_for_fn)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod listener;
pub mod message;
pub mod window;

pub use listener::{ListenerError, MessageListener};
pub use message::{MessageFilter, PostedMessage, WindowId};
pub use window::{InMemoryMedium, MediumError, WindowHandle};

/// Messages buffered per window before slow listeners start lagging.
pub const DEFAULT_WINDOW_CAPACITY: usize = 256;
