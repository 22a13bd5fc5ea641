//! Shared harness: one host window with a bound frame window, a real client
//! installed in the frame and a scripted identity backend behind the host.

use bb_01_client_bridge::BridgeClient;
use bb_02_host_dispatcher::{FrameBinding, HandlerRegistry, HostDispatcher};
use bb_03_signing_coordinator::{
    register_identity_actions, ActiveIdentity, BackendError, IdentityBackend, SignCoordinator,
    SignPhase, SigningApi,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use shared_medium::{InMemoryMedium, WindowHandle};
use shared_protocol::{BridgeConfig, BridgeText, ChannelName, PROTOCOL_VERSION};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const TEST_IDENTITY: &str = "did:bucky:alice";
pub const TEST_PASSWORD: &str = "correct horse";

/// Identity backend with a fixed password. Signatures are `sig:<message>`.
pub struct ScriptedBackend {
    identity: Mutex<Option<ActiveIdentity>>,
    password: String,
    failure: Mutex<Option<BackendError>>,
    sign_calls: AtomicUsize,
}

impl ScriptedBackend {
    /// Active identity with a public key and the test password.
    pub fn new() -> Self {
        Self {
            identity: Mutex::new(Some(ActiveIdentity {
                id: TEST_IDENTITY.to_string(),
                public_key: Some(Self::test_key()),
            })),
            password: TEST_PASSWORD.to_string(),
            failure: Mutex::new(None),
            sign_calls: AtomicUsize::new(0),
        }
    }

    pub fn without_identity() -> Self {
        let backend = Self::new();
        *backend.identity.lock() = None;
        backend
    }

    pub fn without_key() -> Self {
        let backend = Self::new();
        if let Some(identity) = backend.identity.lock().as_mut() {
            identity.public_key = None;
        }
        backend
    }

    pub fn test_key() -> Value {
        json!({ "kty": "OKP", "crv": "Ed25519", "x": "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo" })
    }

    /// Make every sign call after this one fail with `error`.
    pub fn fail_with(&self, error: BackendError) {
        *self.failure.lock() = Some(error);
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IdentityBackend for ScriptedBackend {
    async fn active_identity(&self) -> Result<Option<ActiveIdentity>, BackendError> {
        Ok(self.identity.lock().clone())
    }

    async fn sign_with_active_identity(
        &self,
        password: &str,
        messages: &[String],
    ) -> Result<Vec<String>, BackendError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.failure.lock().clone() {
            return Err(error);
        }
        if password != self.password {
            return Err(BackendError::invalid_password());
        }
        Ok(messages.iter().map(|m| format!("sig:{m}")).collect())
    }
}

/// Host and frame wired over one medium.
pub struct BridgeHarness {
    pub medium: InMemoryMedium,
    pub host: WindowHandle,
    pub frame: WindowHandle,
    pub backend: Arc<ScriptedBackend>,
    pub coordinator: Arc<SignCoordinator>,
    pub binding: FrameBinding,
    pub client: Arc<BridgeClient>,
}

impl BridgeHarness {
    pub fn start(backend: ScriptedBackend) -> Self {
        Self::with_registry(backend, |registry| registry)
    }

    /// Start with extra handlers added on top of the identity actions.
    pub fn with_registry<F>(backend: ScriptedBackend, extend: F) -> Self
    where
        F: FnOnce(HandlerRegistry) -> HandlerRegistry,
    {
        let medium = InMemoryMedium::new();
        let host = medium.open_window();
        let frame = medium.open_window();

        let backend = Arc::new(backend);
        let coordinator = Arc::new(SignCoordinator::new(backend.clone(), BridgeText::default()));
        let registry = extend(register_identity_actions(
            HandlerRegistry::new(),
            coordinator.clone(),
            PROTOCOL_VERSION,
        ));
        let binding = HostDispatcher::bind(
            &host,
            frame.id(),
            Arc::new(registry),
            ChannelName::default(),
        );

        let client = BridgeClient::install(&frame, host.id(), &BridgeConfig::default()).unwrap();

        Self {
            medium,
            host,
            frame,
            backend,
            coordinator,
            binding,
            client,
        }
    }

    /// Wait until the sign workflow reaches `phase`.
    pub async fn wait_for_phase(&self, phase: SignPhase) {
        let mut states = self.coordinator.subscribe();
        // The sender lives as long as the coordinator
        let _ = states.wait_for(|state| state.phase == phase).await;
    }
}
