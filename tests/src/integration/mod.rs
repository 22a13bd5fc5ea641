//! Cross-crate scenarios.

#[cfg(test)]
pub mod fixtures;

mod e2e_bridge;
mod e2e_runtime;
mod e2e_signing;
