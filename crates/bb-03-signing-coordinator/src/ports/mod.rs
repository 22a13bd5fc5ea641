//! # Ports Layer
//!
//! - `inbound`: what the prompt side and the handlers call
//! - `outbound`: identity storage and the password prompt UI

pub mod inbound;
pub mod outbound;
