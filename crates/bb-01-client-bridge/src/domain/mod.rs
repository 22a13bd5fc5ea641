//! Client-side domain: request ids, the pending table and errors.

pub mod error;
pub mod pending;
pub mod request_id;
