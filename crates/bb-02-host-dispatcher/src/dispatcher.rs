//! # Dispatcher
//!
//! Listener loop for one host/frame binding. The loop owns the handler tasks
//! it spawns; stopping the binding aborts the loop and every handler still in
//! flight.

use crate::domain::registry::HandlerRegistry;
use crate::domain::stats::{DispatchStats, DispatchStatsSnapshot};
use crate::ports::inbound::{ActionHandler, ActionRequest};
use futures::FutureExt;
use serde_json::Value;
use shared_medium::{MessageFilter, MessageListener, PostedMessage, WindowHandle, WindowId};
use shared_protocol::{ActionResponse, BridgeAction, ChannelName, RequestEnvelope, ResponseEnvelope};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, error, info, trace, warn};

/// Routes requests from one frame to the registered handlers.
pub struct HostDispatcher {
    host: WindowHandle,
    frame: WindowId,
    registry: Arc<HandlerRegistry>,
    channel: ChannelName,
    stats: Arc<DispatchStats>,
}

impl HostDispatcher {
    /// Start serving requests that `frame` posts to `host` on `channel`.
    ///
    /// The listener is attached before this returns, so nothing posted
    /// afterwards is missed.
    pub fn bind(
        host: &WindowHandle,
        frame: WindowId,
        registry: Arc<HandlerRegistry>,
        channel: ChannelName,
    ) -> FrameBinding {
        let stats = Arc::new(DispatchStats::default());
        let listener = host.listen(MessageFilter::all());

        info!(
            host = %host.id(),
            frame = %frame,
            channel = %channel,
            actions = ?registry.actions(),
            "Frame bound"
        );

        let dispatcher = Arc::new(Self {
            host: host.clone(),
            frame,
            registry,
            channel: channel.clone(),
            stats: stats.clone(),
        });
        let task = tokio::spawn(dispatcher.run(listener));

        FrameBinding {
            task: Some(task),
            stats,
            frame,
            channel,
        }
    }

    async fn run(self: Arc<Self>, mut listener: MessageListener) {
        let mut handlers = JoinSet::new();

        loop {
            tokio::select! {
                message = listener.recv() => {
                    let Some(message) = message else { break };
                    self.on_message(message, &mut handlers);
                }
                // Reap finished handler tasks
                Some(_) = handlers.join_next(), if !handlers.is_empty() => {}
            }
        }

        debug!(frame = %self.frame, "Dispatcher stopped");
    }

    fn on_message(self: &Arc<Self>, message: PostedMessage, handlers: &mut JoinSet<()>) {
        DispatchStats::bump(&self.stats.received);

        if message.source != self.frame {
            DispatchStats::bump(&self.stats.dropped);
            trace!(source = %message.source, "Dropped message from foreign window");
            return;
        }

        let Some(request) = RequestEnvelope::from_message(&message.data, &self.channel) else {
            DispatchStats::bump(&self.stats.dropped);
            trace!(frame = %self.frame, "Dropped message outside the bridge channel");
            return;
        };

        let action = BridgeAction::from_name(&request.action);
        let Some(handler) = self.registry.get(&action) else {
            DispatchStats::bump(&self.stats.unknown);
            debug!(request_id = %request.id, action = %request.action, "Unknown action");
            let payload = ActionResponse::unknown_action(&request.action).into_value();
            self.reply(&request, payload);
            return;
        };

        DispatchStats::bump(&self.stats.dispatched);
        debug!(request_id = %request.id, action = %action, "Dispatching request");

        let dispatcher = Arc::clone(self);
        handlers.spawn(async move { dispatcher.run_handler(handler, action, request).await });
    }

    async fn run_handler(
        &self,
        handler: Arc<dyn ActionHandler>,
        action: BridgeAction,
        mut request: RequestEnvelope,
    ) {
        let call = ActionRequest {
            id: request.id.clone(),
            action,
            payload: std::mem::take(&mut request.payload),
            source: self.frame,
        };

        let outcome = AssertUnwindSafe(handler.handle(call)).catch_unwind().await;

        let payload = match outcome {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                DispatchStats::bump(&self.stats.failed);
                warn!(request_id = %request.id, action = %request.action, error = %e, "Handler failed");
                ActionResponse::native_error(e.to_string()).into_value()
            }
            Err(panic) => {
                DispatchStats::bump(&self.stats.failed);
                let message = panic_message(panic.as_ref());
                error!(request_id = %request.id, action = %request.action, panic = %message, "Handler panicked");
                ActionResponse::native_error(message).into_value()
            }
        };

        self.reply(&request, payload);
    }

    fn reply(&self, request: &RequestEnvelope, payload: Value) {
        let response = ResponseEnvelope::reply_to(request, payload);
        match self.host.post_message(self.frame, response.to_value()) {
            Ok(_) => DispatchStats::bump(&self.stats.replied),
            Err(e) => {
                warn!(request_id = %request.id, frame = %self.frame, error = %e, "Failed to post reply")
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        format!("handler panicked: {s}")
    } else if let Some(s) = panic.downcast_ref::<String>() {
        format!("handler panicked: {s}")
    } else {
        "handler panicked".to_string()
    }
}

/// A live host/frame binding. Dropping it detaches the listener.
pub struct FrameBinding {
    task: Option<JoinHandle<()>>,
    stats: Arc<DispatchStats>,
    frame: WindowId,
    channel: ChannelName,
}

impl FrameBinding {
    /// Stop serving the frame. Handlers still running are aborted.
    pub fn unbind(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!(frame = %self.frame, channel = %self.channel, "Frame unbound");
        }
    }

    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn frame(&self) -> WindowId {
        self.frame
    }

    pub fn channel(&self) -> &ChannelName {
        &self.channel
    }

    pub fn stats(&self) -> DispatchStatsSnapshot {
        self.stats.snapshot()
    }
}

impl Drop for FrameBinding {
    fn drop(&mut self) {
        self.stop();
    }
}
