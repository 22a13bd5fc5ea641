//! # Bridge Telemetry
//!
//! Structured logging for the bridge binaries.
//!
//! - `RUST_LOG` wins over the configured level when set.
//! - Pretty output for development, JSON lines for containers.
//!
//! ```rust,ignore
//! let config = TelemetryConfig::from_env();
//! bridge_telemetry::init_tracing(&config)?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod config;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::init_tracing;

use thiserror::Error;

/// Telemetry errors.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),
}
