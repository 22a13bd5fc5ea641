//! Identity actions: `getPublicKey`, `signWithActiveIdentity` (and its legacy
//! alias), `getVersion`.

use crate::ports::inbound::SigningApi;
use crate::ports::outbound::IdentityBackend;
use crate::service::SignCoordinator;
use bb_02_host_dispatcher::{ActionHandler, ActionRequest, HandlerError, HandlerRegistry};
use serde_json::{json, Value};
use shared_protocol::{ActionResponse, BridgeAction, BridgeText, ErrorCode, SignRequestPayload};
use std::sync::Arc;
use tracing::debug;

/// Answers with the active identity's public key, JSON-serialized.
pub struct PublicKeyHandler {
    backend: Arc<dyn IdentityBackend>,
    text: BridgeText,
}

impl PublicKeyHandler {
    pub fn new(backend: Arc<dyn IdentityBackend>, text: BridgeText) -> Self {
        Self { backend, text }
    }
}

#[async_trait::async_trait]
impl ActionHandler for PublicKeyHandler {
    async fn handle(&self, _request: ActionRequest) -> Result<Value, HandlerError> {
        let identity = self
            .backend
            .active_identity()
            .await
            .map_err(|e| HandlerError::native(e.message))?;

        let key = match identity.and_then(|identity| identity.public_key) {
            Some(key) => serde_json::to_string(&key)?,
            None => {
                debug!("No public key for the active identity");
                return Ok(ActionResponse::error(ErrorCode::NoKey, self.text.no_key.clone())
                    .into_value());
            }
        };

        Ok(ActionResponse::success(json!({ "key": key })).into_value())
    }
}

/// Routes sign requests into the coordinator.
pub struct SignHandler {
    coordinator: Arc<SignCoordinator>,
}

impl SignHandler {
    pub fn new(coordinator: Arc<SignCoordinator>) -> Self {
        Self { coordinator }
    }
}

#[async_trait::async_trait]
impl ActionHandler for SignHandler {
    async fn handle(&self, request: ActionRequest) -> Result<Value, HandlerError> {
        let payload = SignRequestPayload::from_payload(&request.payload);
        debug!(request_id = %request.id, messages = payload.messages.len(), "Sign request received");
        Ok(self.coordinator.sign(payload.messages).await.into_value())
    }
}

pub struct VersionHandler {
    version: String,
}

impl VersionHandler {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

#[async_trait::async_trait]
impl ActionHandler for VersionHandler {
    async fn handle(&self, _request: ActionRequest) -> Result<Value, HandlerError> {
        Ok(ActionResponse::success(json!({ "version": self.version })).into_value())
    }
}

/// Register the identity actions backed by `coordinator` into `registry`.
pub fn register_identity_actions(
    registry: HandlerRegistry,
    coordinator: Arc<SignCoordinator>,
    version: &str,
) -> HandlerRegistry {
    let public_key = PublicKeyHandler::new(coordinator.backend().clone(), coordinator.text().clone());
    registry
        .with(BridgeAction::GetPublicKey, public_key)
        .with(BridgeAction::SignWithActiveIdentity, SignHandler::new(coordinator))
        .with(BridgeAction::GetVersion, VersionHandler::new(version))
}
