//! Pending Request Store - maps request ids to callers waiting on a reply.
//!
//! Flow:
//! 1. Client generates a `RequestId`
//! 2. Client calls `register()` to get a oneshot receiver
//! 3. Client posts the request envelope
//! 4. Reply listener receives the reply and calls `complete()`
//! 5. Client awaits the receiver, or calls `expire()` when its timeout elapses
//!
//! Every path removes the entry from the map before touching the sender, so
//! an entry resolves at most once no matter how replies and timeouts race.

use crate::domain::request_id::RequestId;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::debug;

/// Reply delivered to a waiting caller.
#[derive(Debug)]
pub struct HostReply {
    pub id: RequestId,
    /// Reply payload, verbatim
    pub payload: Value,
    pub response_time: Duration,
}

struct PendingRequest {
    sender: oneshot::Sender<HostReply>,
    created_at: Instant,
    action: String,
    /// `None` for actions that never time out
    timeout: Option<Duration>,
}

/// Statistics for the pending request store
#[derive(Debug, Default)]
pub struct PendingStats {
    pub total_registered: AtomicU64,
    pub total_completed: AtomicU64,
    pub total_timeouts: AtomicU64,
    /// Entries removed without a reply (send failure, dropped caller)
    pub total_cancelled: AtomicU64,
}

pub struct PendingRequestStore {
    pending: DashMap<RequestId, PendingRequest>,
    stats: Arc<PendingStats>,
}

impl PendingRequestStore {
    pub fn new() -> Self {
        Self {
            pending: DashMap::new(),
            stats: Arc::new(PendingStats::default()),
        }
    }

    /// Register a pending request and get a receiver for the reply.
    pub fn register(
        &self,
        id: RequestId,
        action: &str,
        timeout: Option<Duration>,
    ) -> oneshot::Receiver<HostReply> {
        let (tx, rx) = oneshot::channel();

        debug!(
            request_id = %id,
            action = action,
            timeout_ms = timeout.map(|t| t.as_millis() as u64),
            "Registered pending request"
        );

        self.pending.insert(
            id,
            PendingRequest {
                sender: tx,
                created_at: Instant::now(),
                action: action.to_string(),
                timeout,
            },
        );
        self.stats.total_registered.fetch_add(1, Ordering::Relaxed);

        rx
    }

    /// Complete a pending request with the reply payload.
    ///
    /// Returns false if the id is unknown or already resolved.
    pub fn complete(&self, id: &RequestId, payload: Value) -> bool {
        let Some((id, pending)) = self.pending.remove(id) else {
            debug!(request_id = %id, "Reply for unknown or expired request id");
            return false;
        };

        let response_time = pending.created_at.elapsed();
        let reply = HostReply {
            id,
            payload,
            response_time,
        };

        match pending.sender.send(reply) {
            Ok(()) => {
                self.stats.total_completed.fetch_add(1, Ordering::Relaxed);
                debug!(
                    action = pending.action,
                    response_time_ms = response_time.as_millis() as u64,
                    "Completed pending request"
                );
                true
            }
            Err(reply) => {
                // Caller stopped waiting
                self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
                debug!(
                    request_id = %reply.id,
                    action = pending.action,
                    "Pending request receiver dropped"
                );
                false
            }
        }
    }

    /// Remove an entry whose timeout elapsed.
    pub fn expire(&self, id: &RequestId) -> bool {
        match self.pending.remove(id) {
            Some((_, pending)) => {
                self.stats.total_timeouts.fetch_add(1, Ordering::Relaxed);
                debug!(
                    request_id = %id,
                    action = pending.action,
                    elapsed_ms = pending.created_at.elapsed().as_millis() as u64,
                    timeout_ms = pending.timeout.map(|t| t.as_millis() as u64),
                    "Pending request expired"
                );
                true
            }
            None => false,
        }
    }

    /// Remove an entry without resolving it.
    pub fn cancel(&self, id: &RequestId) -> bool {
        if self.pending.remove(id).is_some() {
            self.stats.total_cancelled.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Drop every entry. Waiting callers see their reply channel close.
    pub fn cancel_all(&self) -> usize {
        let ids: Vec<RequestId> = self.pending.iter().map(|e| e.key().clone()).collect();
        ids.iter().filter(|id| self.cancel(id)).count()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, id: &RequestId) -> bool {
        self.pending.contains_key(id)
    }

    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }
}

impl Default for PendingRequestStore {
    fn default() -> Self {
        Self::new()
    }
}
