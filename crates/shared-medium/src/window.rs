//! # Windows
//!
//! The medium keeps a registry of open windows so a message can be routed by
//! target id. Each window is a `tokio::sync::broadcast` channel: every
//! listener attached to the window sees every message posted to it.

use crate::listener::MessageListener;
use crate::message::{MessageFilter, PostedMessage, WindowId};
use crate::DEFAULT_WINDOW_CAPACITY;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Errors from posting on the medium.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MediumError {
    /// Target window is not (or no longer) open.
    #[error("unknown window: {0}")]
    UnknownWindow(WindowId),
}

type Globals = HashMap<String, Arc<dyn Any + Send + Sync>>;

struct WindowInner {
    id: WindowId,
    sender: broadcast::Sender<PostedMessage>,
    globals: Mutex<Globals>,
}

struct MediumInner {
    windows: RwLock<HashMap<WindowId, Arc<WindowInner>>>,
    messages_posted: AtomicU64,
    capacity: usize,
}

/// In-memory messaging medium.
///
/// Cheap to clone; clones share the same window registry.
#[derive(Clone)]
pub struct InMemoryMedium {
    inner: Arc<MediumInner>,
}

impl InMemoryMedium {
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_WINDOW_CAPACITY)
    }

    /// Create a medium whose windows buffer `capacity` messages each.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(MediumInner {
                windows: RwLock::new(HashMap::new()),
                messages_posted: AtomicU64::new(0),
                capacity,
            }),
        }
    }

    /// Open a new window and return its handle.
    pub fn open_window(&self) -> WindowHandle {
        let (sender, _) = broadcast::channel(self.inner.capacity);
        let window = Arc::new(WindowInner {
            id: WindowId::new(),
            sender,
            globals: Mutex::new(HashMap::new()),
        });
        self.inner.windows.write().insert(window.id, window.clone());

        debug!(window = %window.id, "Window opened");

        WindowHandle {
            window,
            medium: self.inner.clone(),
        }
    }

    /// Look up an open window.
    pub fn window(&self, id: WindowId) -> Option<WindowHandle> {
        let window = self.inner.windows.read().get(&id).cloned()?;
        Some(WindowHandle {
            window,
            medium: self.inner.clone(),
        })
    }

    /// Close a window. Later posts to it fail with [`MediumError::UnknownWindow`].
    pub fn close_window(&self, id: WindowId) -> bool {
        let removed = self.inner.windows.write().remove(&id).is_some();
        if removed {
            debug!(window = %id, "Window closed");
        }
        removed
    }

    #[must_use]
    pub fn window_count(&self) -> usize {
        self.inner.windows.read().len()
    }

    /// Total messages accepted for delivery.
    #[must_use]
    pub fn messages_posted(&self) -> u64 {
        self.inner.messages_posted.load(Ordering::Relaxed)
    }
}

impl Default for InMemoryMedium {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to one window on the medium.
#[derive(Clone)]
pub struct WindowHandle {
    window: Arc<WindowInner>,
    medium: Arc<MediumInner>,
}

impl WindowHandle {
    #[must_use]
    pub fn id(&self) -> WindowId {
        self.window.id
    }

    /// Post `data` to `target`, stamped with this window as the source.
    ///
    /// Returns the number of listeners that received it; a window with no
    /// listeners silently drops the message.
    pub fn post_message(&self, target: WindowId, data: Value) -> Result<usize, MediumError> {
        let target_window = self
            .medium
            .windows
            .read()
            .get(&target)
            .cloned()
            .ok_or(MediumError::UnknownWindow(target))?;

        self.medium.messages_posted.fetch_add(1, Ordering::Relaxed);

        let message = PostedMessage {
            source: self.window.id,
            data,
        };

        match target_window.sender.send(message) {
            Ok(receivers) => {
                trace!(source = %self.window.id, target = %target, receivers, "Message posted");
                Ok(receivers)
            }
            Err(_) => {
                trace!(source = %self.window.id, target = %target, "Message dropped (no listeners)");
                Ok(0)
            }
        }
    }

    /// Attach a listener to this window.
    #[must_use]
    pub fn listen(&self, filter: MessageFilter) -> MessageListener {
        MessageListener::new(self.window.sender.subscribe(), filter, self.window.id)
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.window.sender.receiver_count()
    }

    /// Fetch the global stored under `key`, installing `init()` if absent.
    ///
    /// Returns the value and whether it was installed by this call. A slot
    /// holding a value of another type is replaced.
    pub fn get_or_install<T, F>(&self, key: &str, init: F) -> (Arc<T>, bool)
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        let mut globals = self.window.globals.lock();
        if let Some(existing) = globals.get(key) {
            if let Ok(value) = existing.clone().downcast::<T>() {
                return (value, false);
            }
        }

        let value = Arc::new(init());
        globals.insert(key.to_string(), value.clone());
        (value, true)
    }

    /// Whether a global is installed under `key`.
    pub fn has_global(&self, key: &str) -> bool {
        self.window.globals.lock().contains_key(key)
    }

    /// Remove the global stored under `key`.
    pub fn remove_global(&self, key: &str) -> bool {
        self.window.globals.lock().remove(key).is_some()
    }
}

impl std::fmt::Debug for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WindowHandle")
            .field("id", &self.window.id)
            .finish()
    }
}
