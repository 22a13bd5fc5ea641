//! # Sign Coordinator Service
//!
//! Serializes sign requests for one frame binding behind a password prompt.
//!
//! The caller of [`sign`](SigningApi::sign) parks on a oneshot receiver; the
//! matching sender lives in the coordinator state and is taken out by every
//! resolving transition, so each request resolves at most once. State lives
//! behind a `parking_lot::Mutex` that is never held across an `.await`; the
//! backend is always called with the lock released.
//!
//! Every opened request gets a new generation number. A backend result is
//! applied only if the request it was started for is still the open one, and
//! a caller that stops waiting (its handler task aborted on unbind) closes its
//! own prompt.

use crate::domain::errors::CoordinatorError;
use crate::domain::state::{SignPhase, SignRequestState};
use crate::ports::inbound::{ConfirmOutcome, SigningApi};
use crate::ports::outbound::IdentityBackend;
use parking_lot::Mutex;
use serde_json::json;
use shared_protocol::{ActionResponse, BridgeText, ErrorCode};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

struct Inner {
    state: SignRequestState,
    resolver: Option<oneshot::Sender<ActionResponse>>,
    /// Generation of the most recently opened request
    generation: u64,
}

/// Held by a waiting `sign` call; closes the prompt if the call is dropped.
struct OpenRequest<'a> {
    coordinator: &'a SignCoordinator,
    generation: u64,
}

impl Drop for OpenRequest<'_> {
    fn drop(&mut self) {
        self.coordinator.release(self.generation);
    }
}

pub struct SignCoordinator {
    backend: Arc<dyn IdentityBackend>,
    text: BridgeText,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<SignRequestState>,
}

impl SignCoordinator {
    pub fn new(backend: Arc<dyn IdentityBackend>, text: BridgeText) -> Self {
        let (state_tx, _) = watch::channel(SignRequestState::default());
        Self {
            backend,
            text,
            inner: Mutex::new(Inner {
                state: SignRequestState::default(),
                resolver: None,
                generation: 0,
            }),
            state_tx,
        }
    }

    pub fn backend(&self) -> &Arc<dyn IdentityBackend> {
        &self.backend
    }

    pub fn text(&self) -> &BridgeText {
        &self.text
    }

    /// Resolve any open request with `NativeError` and close the prompt.
    ///
    /// For teardown: the frame went away or the host is shutting down.
    pub fn abandon(&self) -> bool {
        let mut inner = self.inner.lock();
        if !inner.state.is_open() {
            return false;
        }
        let response = ActionResponse::native_error(self.text.abandoned.clone());
        self.resolve(&mut inner, response);
        self.close(&mut inner);
        warn!("Sign request abandoned");
        true
    }

    /// Close request `generation` if it is still open. Its caller is gone.
    fn release(&self, generation: u64) {
        let mut inner = self.inner.lock();
        if inner.generation != generation || !inner.state.is_open() {
            return;
        }
        inner.resolver = None;
        let phase = inner.state.phase;
        self.close(&mut inner);
        info!(generation, ?phase, "Sign caller went away, prompt closed");
    }

    /// Hand `response` to the waiting caller, if it is still there.
    fn resolve(&self, inner: &mut Inner, response: ActionResponse) {
        let code = response.code;
        match inner.resolver.take() {
            Some(resolver) => {
                if resolver.send(response).is_err() {
                    debug!(code = %code, "Sign caller no longer waiting");
                }
            }
            None => debug!(code = %code, "Sign request already resolved"),
        }
    }

    fn close(&self, inner: &mut Inner) {
        inner.state = SignRequestState::default();
        self.publish(&inner.state);
    }

    fn publish(&self, state: &SignRequestState) {
        self.state_tx.send_replace(state.clone());
    }
}

#[async_trait::async_trait]
impl SigningApi for SignCoordinator {
    async fn sign(&self, messages: Vec<String>) -> ActionResponse {
        let messages: Vec<String> = messages
            .into_iter()
            .filter(|m| !m.trim().is_empty())
            .collect();
        if messages.is_empty() {
            return ActionResponse::error(ErrorCode::NoMessage, self.text.sign_empty.clone());
        }

        let identity = match self.backend.active_identity().await {
            Ok(Some(identity)) => identity,
            Ok(None) => {
                return ActionResponse::error(
                    ErrorCode::NoActiveIdentity,
                    self.text.no_active_identity.clone(),
                )
            }
            Err(e) => {
                warn!(error = %e, code = e.code.as_u32(), "Failed to read active identity");
                return ActionResponse::native_error(e.message);
            }
        };

        let (receiver, generation) = {
            let mut inner = self.inner.lock();
            if inner.state.is_open() {
                debug!(phase = ?inner.state.phase, "Sign request refused, prompt busy");
                return ActionResponse::error(ErrorCode::Busy, self.text.busy.clone());
            }

            let (resolver, receiver) = oneshot::channel();
            inner.generation += 1;
            inner.resolver = Some(resolver);
            inner.state = SignRequestState::awaiting(messages, identity.id);
            self.publish(&inner.state);

            info!(
                generation = inner.generation,
                identity = ?inner.state.identity,
                messages = inner.state.messages.len(),
                "Sign request awaiting password"
            );
            (receiver, inner.generation)
        };

        let _open = OpenRequest {
            coordinator: self,
            generation,
        };
        match receiver.await {
            Ok(response) => response,
            Err(_) => ActionResponse::native_error(self.text.abandoned.clone()),
        }
    }

    fn set_password(&self, value: String) -> Result<(), CoordinatorError> {
        let mut inner = self.inner.lock();
        match inner.state.phase {
            SignPhase::Idle => Err(CoordinatorError::NoPrompt),
            SignPhase::Verifying => Err(CoordinatorError::Loading),
            SignPhase::AwaitingPassword => {
                inner.state.password = value;
                self.publish(&inner.state);
                Ok(())
            }
        }
    }

    async fn confirm(&self) -> Result<ConfirmOutcome, CoordinatorError> {
        let (generation, password, messages) = {
            let mut inner = self.inner.lock();
            match inner.state.phase {
                SignPhase::Idle => return Err(CoordinatorError::NoPrompt),
                SignPhase::Verifying => return Err(CoordinatorError::Loading),
                SignPhase::AwaitingPassword => {}
            }
            inner.state.phase = SignPhase::Verifying;
            inner.state.error = None;
            self.publish(&inner.state);
            (
                inner.generation,
                inner.state.password.clone(),
                inner.state.messages.clone(),
            )
        };

        debug!(messages = messages.len(), "Verifying password");
        let result = self
            .backend
            .sign_with_active_identity(&password, &messages)
            .await;

        let mut inner = self.inner.lock();
        if inner.generation != generation || inner.state.phase != SignPhase::Verifying {
            // Closed while the backend was working; the result belongs to nobody
            debug!(
                generation,
                current = inner.generation,
                "Discarding backend result for a closed sign request"
            );
            return Err(CoordinatorError::NoPrompt);
        }

        match result {
            Ok(signatures) => {
                info!(signatures = signatures.len(), "Sign request completed");
                self.resolve(
                    &mut inner,
                    ActionResponse::success(json!({ "signatures": signatures })),
                );
                self.close(&mut inner);
                Ok(ConfirmOutcome::Signed)
            }
            Err(e) if e.is_invalid_password() => {
                info!("Password rejected, awaiting retry");
                inner.state.phase = SignPhase::AwaitingPassword;
                inner.state.password.clear();
                inner.state.error = Some(self.text.invalid_password.clone());
                self.publish(&inner.state);
                Ok(ConfirmOutcome::InvalidPassword)
            }
            Err(e) => {
                warn!(error = %e, code = e.code.as_u32(), "Sign request failed");
                self.resolve(&mut inner, ActionResponse::native_error(e.message));
                self.close(&mut inner);
                Ok(ConfirmOutcome::Failed)
            }
        }
    }

    fn cancel(&self) -> Result<(), CoordinatorError> {
        let mut inner = self.inner.lock();
        match inner.state.phase {
            SignPhase::Idle => Err(CoordinatorError::NoPrompt),
            SignPhase::Verifying => {
                debug!("Cancel ignored while verifying");
                Err(CoordinatorError::Loading)
            }
            SignPhase::AwaitingPassword => {
                let response =
                    ActionResponse::error(ErrorCode::Cancelled, self.text.cancelled.clone());
                self.resolve(&mut inner, response);
                self.close(&mut inner);
                info!("Sign request cancelled");
                Ok(())
            }
        }
    }

    fn state(&self) -> SignRequestState {
        self.inner.lock().state.clone()
    }

    fn subscribe(&self) -> watch::Receiver<SignRequestState> {
        self.state_tx.subscribe()
    }
}

impl Drop for SignCoordinator {
    fn drop(&mut self) {
        let inner = self.inner.get_mut();
        if let Some(resolver) = inner.resolver.take() {
            let _ = resolver.send(ActionResponse::native_error(self.text.abandoned.clone()));
        }
    }
}
