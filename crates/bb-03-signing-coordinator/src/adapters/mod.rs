//! # Adapters
//!
//! - `handlers`: the identity actions served to frames through the dispatcher
//! - `prompt`: drives a [`PromptPresenter`](crate::ports::outbound::PromptPresenter)
//!   from the published sign state

pub mod handlers;
pub mod prompt;
