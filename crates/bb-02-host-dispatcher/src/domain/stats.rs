//! Dispatch counters, shared between a binding and its listener task.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct DispatchStats {
    /// Messages seen on the host window
    pub received: AtomicU64,
    /// Messages dropped silently (foreign source, wrong channel, malformed)
    pub dropped: AtomicU64,
    /// Requests handed to a handler
    pub dispatched: AtomicU64,
    /// Requests answered with `UnknownAction`
    pub unknown: AtomicU64,
    /// Handlers that returned an error or panicked
    pub failed: AtomicU64,
    /// Replies successfully posted back to the frame
    pub replied: AtomicU64,
}

/// Point-in-time copy of [`DispatchStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStatsSnapshot {
    pub received: u64,
    pub dropped: u64,
    pub dispatched: u64,
    pub unknown: u64,
    pub failed: u64,
    pub replied: u64,
}

impl DispatchStats {
    pub fn snapshot(&self) -> DispatchStatsSnapshot {
        DispatchStatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            unknown: self.unknown.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            replied: self.replied.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
