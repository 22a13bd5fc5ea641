//! # Bridge Runtime Library
//!
//! Exposes the runtime's building blocks for the binary and for tests.
//!
//! - `config` - file + environment configuration
//! - `dev_backend` - development identity backend
//! - `terminal` - password prompt on stdin
//! - `runtime` - host/frame wiring over the in-memory medium

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod config;
pub mod dev_backend;
pub mod runtime;
pub mod terminal;

pub use config::{ConfigLoadError, DevIdentityConfig, RuntimeConfig};
pub use dev_backend::DevIdentityBackend;
pub use runtime::BridgeRuntime;
pub use terminal::TerminalPresenter;
