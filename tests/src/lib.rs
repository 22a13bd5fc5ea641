//! # Bucky Bridge Test Suite
//!
//! End-to-end scenarios: a real client in a frame window talking to a real
//! dispatcher and coordinator in a host window, over the in-memory medium.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs      # Host/frame harness, scripted backend
//!     ├── e2e_bridge.rs    # Envelope routing, unknown actions, timeouts
//!     ├── e2e_signing.rs   # Password prompt flows through the bridge
//!     └── e2e_runtime.rs   # The runtime wiring with the development backend
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p bb-tests
//! cargo test -p bb-tests integration::e2e_signing
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod integration;
