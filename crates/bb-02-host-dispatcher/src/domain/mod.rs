//! Dispatcher domain: handler errors, the action registry and counters.

pub mod error;
pub mod registry;
pub mod stats;
