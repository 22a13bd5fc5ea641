//! # Message Listener
//!
//! Receiving side of a window. Dropping the listener detaches it.

use crate::message::{MessageFilter, PostedMessage, WindowId};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::debug;

/// Errors from listener operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ListenerError {
    /// Every handle to the window was dropped.
    #[error("window closed")]
    Closed,
}

/// A listener attached to one window.
pub struct MessageListener {
    receiver: broadcast::Receiver<PostedMessage>,
    filter: MessageFilter,
    window: WindowId,
}

impl MessageListener {
    pub(crate) fn new(
        receiver: broadcast::Receiver<PostedMessage>,
        filter: MessageFilter,
        window: WindowId,
    ) -> Self {
        Self {
            receiver,
            filter,
            window,
        }
    }

    /// Receive the next message that passes the filter.
    ///
    /// Returns `None` once the window is gone.
    pub async fn recv(&mut self) -> Option<PostedMessage> {
        loop {
            let message = match self.receiver.recv().await {
                Ok(m) => m,
                Err(broadcast::error::RecvError::Closed) => return None,
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    debug!(window = %self.window, lagged = count, "Listener lagged, messages dropped");
                    continue;
                }
            };

            if self.filter.matches(&message) {
                return Some(message);
            }
        }
    }

    /// Receive without waiting.
    pub fn try_recv(&mut self) -> Result<Option<PostedMessage>, ListenerError> {
        loop {
            let message = match self.receiver.try_recv() {
                Ok(m) => m,
                Err(broadcast::error::TryRecvError::Empty) => return Ok(None),
                Err(broadcast::error::TryRecvError::Closed) => return Err(ListenerError::Closed),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            };

            if self.filter.matches(&message) {
                return Ok(Some(message));
            }
        }
    }

    #[must_use]
    pub fn filter(&self) -> &MessageFilter {
        &self.filter
    }

    /// Window this listener is attached to.
    #[must_use]
    pub fn window(&self) -> WindowId {
        self.window
    }
}

impl Drop for MessageListener {
    fn drop(&mut self) {
        debug!(window = %self.window, "Listener detached");
    }
}
