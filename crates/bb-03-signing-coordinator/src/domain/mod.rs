//! # Domain Layer
//!
//! The sign workflow state and the prompt contents derived from it. No I/O.

pub mod errors;
pub mod prompt;
pub mod state;
