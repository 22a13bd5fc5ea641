//! Ports of the dispatcher.
//!
//! The dispatcher only drives handlers; everything it needs from the outside
//! world arrives through the medium.

pub mod inbound;
