//! # Bridge Client
//!
//! Frame-side entry point. Owns the pending table and the reply listener for
//! one window and channel.

use crate::domain::error::ClientError;
use crate::domain::pending::{PendingRequestStore, PendingStats};
use crate::domain::request_id::{RequestId, RequestIdGenerator};
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared_medium::{MessageFilter, MessageListener, WindowHandle, WindowId};
use shared_protocol::{
    ActionResponse, BridgeAction, BridgeConfig, ChannelName, RequestEnvelope, ResponseEnvelope,
    TimeoutConfig,
};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Window global under which a client is installed, per channel.
pub const CLIENT_GLOBAL_PREFIX: &str = "bridge-client:";

pub struct BridgeClient {
    window: WindowHandle,
    parent: WindowId,
    channel: ChannelName,
    timeouts: TimeoutConfig,
    ids: RequestIdGenerator,
    pending: Arc<PendingRequestStore>,
    listener_task: Mutex<Option<JoinHandle<()>>>,
}

impl BridgeClient {
    /// Install a client into `window`, talking to the host window `parent`.
    ///
    /// If a client for the same channel already lives in the window, that
    /// client is returned untouched.
    pub fn install(
        window: &WindowHandle,
        parent: WindowId,
        config: &BridgeConfig,
    ) -> Result<Arc<Self>, ClientError> {
        config.validate()?;

        let key = format!("{}{}", CLIENT_GLOBAL_PREFIX, config.channel);
        let (client, installed) =
            window.get_or_install(&key, || Self::start(window.clone(), parent, config));

        if installed {
            info!(
                window = %window.id(),
                parent = %parent,
                channel = %config.channel,
                "Bridge client installed"
            );
        } else {
            debug!(window = %window.id(), channel = %config.channel, "Bridge client already installed");
        }

        Ok(client)
    }

    fn start(window: WindowHandle, parent: WindowId, config: &BridgeConfig) -> Self {
        let channel = config.channel_name();
        let pending = Arc::new(PendingRequestStore::new());

        // Attach before any request can be posted so no reply is missed.
        let listener = window.listen(MessageFilter::all());
        let task = tokio::spawn(run_reply_listener(
            listener,
            channel.clone(),
            pending.clone(),
        ));

        Self {
            window,
            parent,
            channel,
            timeouts: config.timeouts.clone(),
            ids: RequestIdGenerator::new(config.id_prefix.clone()),
            pending,
            listener_task: Mutex::new(Some(task)),
        }
    }

    /// Send `action` to the host and wait for the correlated reply payload.
    pub async fn call_host(&self, action: &str, payload: Value) -> Result<Value, ClientError> {
        let id = self.ids.next_id();
        let timeout = self.timeouts.timeout_for(action);
        let rx = self.pending.register(id.clone(), action, timeout);

        let envelope = RequestEnvelope::new(&self.channel, id.as_str(), action, payload);
        if let Err(e) = self.window.post_message(self.parent, envelope.to_value()) {
            self.pending.cancel(&id);
            warn!(request_id = %id, action = action, error = %e, "Failed to post request");
            return Err(ClientError::Medium(e));
        }

        debug!(request_id = %id, action = action, "Posted request to host");

        let outcome = match timeout {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    self.pending.expire(&id);
                    warn!(
                        request_id = %id,
                        action = action,
                        timeout_ms = limit.as_millis() as u64,
                        "Request timed out"
                    );
                    return Err(ClientError::Timeout {
                        action: action.to_string(),
                    });
                }
            },
            None => rx.await,
        };

        match outcome {
            Ok(reply) => Ok(reply.payload),
            Err(_) => Err(ClientError::ReplyDropped {
                action: action.to_string(),
            }),
        }
    }

    /// Public key of the host's active identity.
    pub async fn get_public_key(&self) -> Result<ActionResponse, ClientError> {
        self.call_action(BridgeAction::GetPublicKey, json!({})).await
    }

    /// Ask the host to sign `messages` with the active identity.
    ///
    /// Waits for the user to answer the host's password prompt; not subject
    /// to the default timeout unless configured otherwise.
    pub async fn sign_with_active_identity<S: AsRef<str>>(
        &self,
        messages: &[S],
    ) -> Result<ActionResponse, ClientError> {
        let messages: Vec<&str> = messages.iter().map(AsRef::as_ref).collect();
        self.call_action(
            BridgeAction::SignWithActiveIdentity,
            json!({ "messages": messages }),
        )
        .await
    }

    pub async fn get_version(&self) -> Result<ActionResponse, ClientError> {
        self.call_action(BridgeAction::GetVersion, json!({})).await
    }

    async fn call_action(
        &self,
        action: BridgeAction,
        payload: Value,
    ) -> Result<ActionResponse, ClientError> {
        let value = self.call_host(action.name(), payload).await?;
        ActionResponse::from_value(value).map_err(|e| ClientError::MalformedReply {
            action: action.name().to_string(),
            reason: e.to_string(),
        })
    }

    /// Stop listening for replies and uninstall from the window.
    ///
    /// Requests still waiting fail with [`ClientError::ReplyDropped`].
    pub fn shutdown(&self) {
        if let Some(task) = self.listener_task.lock().take() {
            task.abort();
        }
        let dropped = self.pending.cancel_all();
        if dropped > 0 {
            warn!(dropped, "Dropped requests still waiting on the host");
        }
        let key = format!("{}{}", CLIENT_GLOBAL_PREFIX, self.channel);
        self.window.remove_global(&key);
        info!(window = %self.window.id(), channel = %self.channel, "Bridge client shut down");
    }

    pub fn pending_count(&self) -> usize {
        self.pending.pending_count()
    }

    pub fn is_pending(&self, id: &RequestId) -> bool {
        self.pending.is_pending(id)
    }

    pub fn stats(&self) -> &PendingStats {
        self.pending.stats()
    }

    pub fn channel(&self) -> &ChannelName {
        &self.channel
    }

    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    pub fn parent(&self) -> WindowId {
        self.parent
    }
}

impl Drop for BridgeClient {
    fn drop(&mut self) {
        if let Some(task) = self.listener_task.get_mut().take() {
            task.abort();
        }
    }
}

/// Route `<channel>-result` replies to their pending entries.
async fn run_reply_listener(
    mut listener: MessageListener,
    channel: ChannelName,
    pending: Arc<PendingRequestStore>,
) {
    while let Some(message) = listener.recv().await {
        let Some(reply) = ResponseEnvelope::from_message(&message.data, &channel) else {
            continue;
        };
        pending.complete(&RequestId::from(reply.id), reply.payload);
    }
    debug!(channel = %channel, "Reply listener stopped");
}
