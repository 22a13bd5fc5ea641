//! Host and frame wired together over one in-memory medium.
//!
//! ```text
//! frame window ── BridgeClient ──post──→ host window ── FrameBinding
//!                                                      │
//!                                  HandlerRegistry ────┤
//!                                                      ▼
//!                                    SignCoordinator ◄── prompt driver ◄── presenter
//! ```

use bb_01_client_bridge::{BridgeClient, ClientError};
use bb_02_host_dispatcher::{DispatchStatsSnapshot, FrameBinding, HandlerRegistry, HostDispatcher};
use bb_03_signing_coordinator::{
    drive_prompt, register_identity_actions, IdentityBackend, PromptPresenter, SignCoordinator,
};
use shared_medium::{InMemoryMedium, WindowHandle};
use shared_protocol::PROTOCOL_VERSION;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::RuntimeConfig;

pub struct BridgeRuntime {
    medium: InMemoryMedium,
    host: WindowHandle,
    frame: WindowHandle,
    coordinator: Arc<SignCoordinator>,
    client: Arc<BridgeClient>,
    binding: Option<FrameBinding>,
    prompt_task: Option<JoinHandle<()>>,
}

impl BridgeRuntime {
    /// Open both windows, bind the frame and install its client.
    pub fn start(
        config: &RuntimeConfig,
        backend: Arc<dyn IdentityBackend>,
        presenter: Arc<dyn PromptPresenter>,
    ) -> Result<Self, ClientError> {
        config.bridge.validate()?;

        let medium = InMemoryMedium::new();
        let host = medium.open_window();
        let frame = medium.open_window();

        let coordinator = Arc::new(SignCoordinator::new(backend, config.text.clone()));
        let registry =
            register_identity_actions(HandlerRegistry::new(), coordinator.clone(), PROTOCOL_VERSION);

        let binding = HostDispatcher::bind(
            &host,
            frame.id(),
            Arc::new(registry),
            config.bridge.channel_name(),
        );
        let prompt_task = tokio::spawn(drive_prompt(coordinator.clone(), presenter));
        let client = BridgeClient::install(&frame, host.id(), &config.bridge)?;

        info!(
            host = %host.id(),
            frame = %frame.id(),
            channel = %config.bridge.channel,
            "Bridge runtime started"
        );

        Ok(Self {
            medium,
            host,
            frame,
            coordinator,
            client,
            binding: Some(binding),
            prompt_task: Some(prompt_task),
        })
    }

    /// Client living in the frame window.
    pub fn client(&self) -> &Arc<BridgeClient> {
        &self.client
    }

    pub fn coordinator(&self) -> &Arc<SignCoordinator> {
        &self.coordinator
    }

    pub fn dispatch_stats(&self) -> Option<DispatchStatsSnapshot> {
        self.binding.as_ref().map(FrameBinding::stats)
    }

    /// Tear everything down. Any sign request still open is abandoned.
    pub fn shutdown(mut self) {
        self.coordinator.abandon();
        if let Some(binding) = self.binding.take() {
            binding.unbind();
        }
        if let Some(task) = self.prompt_task.take() {
            task.abort();
        }
        self.client.shutdown();
        self.medium.close_window(self.frame.id());
        self.medium.close_window(self.host.id());
        info!("Bridge runtime stopped");
    }
}

impl Drop for BridgeRuntime {
    fn drop(&mut self) {
        if let Some(task) = self.prompt_task.take() {
            task.abort();
        }
    }
}
