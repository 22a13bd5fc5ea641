//! # Inbound Ports (Driving Ports)
//!
//! Action handlers the host plugs into the dispatcher.

use crate::domain::error::HandlerError;
use serde_json::Value;
use shared_medium::WindowId;
use shared_protocol::BridgeAction;
use std::future::Future;

/// One decoded request, as seen by a handler.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    /// Correlation id chosen by the frame
    pub id: String,
    pub action: BridgeAction,
    /// Request payload; `{}` when the frame sent none
    pub payload: Value,
    /// Frame window that sent the request
    pub source: WindowId,
}

/// Host capability reachable from a frame.
///
/// The returned value is posted back verbatim as the reply payload. Errors
/// (and panics) become `NativeError` replies.
#[async_trait::async_trait]
pub trait ActionHandler: Send + Sync {
    async fn handle(&self, request: ActionRequest) -> Result<Value, HandlerError>;
}

/// Handler backed by an async closure. See [`handler_fn`].
pub struct FnHandler<F> {
    f: F,
}

/// Wrap an async closure as an [`ActionHandler`].
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(ActionRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, HandlerError>> + Send + 'static,
{
    FnHandler { f }
}

#[async_trait::async_trait]
impl<F, Fut> ActionHandler for FnHandler<F>
where
    F: Fn(ActionRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, HandlerError>> + Send + 'static,
{
    async fn handle(&self, request: ActionRequest) -> Result<Value, HandlerError> {
        (self.f)(request).await
    }
}
