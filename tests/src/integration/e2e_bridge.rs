//! Request routing between a frame client and the host dispatcher.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{BridgeHarness, ScriptedBackend, TEST_PASSWORD};
    use bb_01_client_bridge::{BridgeClient, ClientError};
    use bb_02_host_dispatcher::{handler_fn, ActionHandler, ActionRequest, HandlerError};
    use bb_03_signing_coordinator::{SignPhase, SigningApi};
    use serde_json::{json, Value};
    use shared_medium::{InMemoryMedium, MessageFilter};
    use shared_protocol::{
        ActionResponse, BridgeConfig, ChannelName, ErrorCode, PublicKeyData, RequestEnvelope,
        SignatureData, VersionData,
    };
    use std::time::Duration;

    struct Exploding;

    #[async_trait::async_trait]
    impl ActionHandler for Exploding {
        async fn handle(&self, _request: ActionRequest) -> Result<Value, HandlerError> {
            panic!("keystore exploded");
        }
    }

    #[tokio::test]
    async fn test_get_version() {
        let harness = BridgeHarness::start(ScriptedBackend::new());

        let response = harness.client.get_version().await.unwrap();
        assert!(response.is_success());
        let data: VersionData = response.data_as().unwrap().unwrap();
        assert_eq!(data.version, "1.0.0");
    }

    #[tokio::test]
    async fn test_public_key_is_json_encoded() {
        let harness = BridgeHarness::start(ScriptedBackend::new());

        let response = harness.client.get_public_key().await.unwrap();
        assert_eq!(response.code, ErrorCode::Success);

        let data: PublicKeyData = response.data_as().unwrap().unwrap();
        let key: Value = serde_json::from_str(&data.key).unwrap();
        assert_eq!(key, ScriptedBackend::test_key());
    }

    #[tokio::test]
    async fn test_public_key_missing() {
        let harness = BridgeHarness::start(ScriptedBackend::without_key());

        let response = harness.client.get_public_key().await.unwrap();
        assert_eq!(response.code, ErrorCode::NoKey);
        assert!(response.data.is_none());
    }

    #[tokio::test]
    async fn test_public_key_without_identity() {
        let harness = BridgeHarness::start(ScriptedBackend::without_identity());

        let response = harness.client.get_public_key().await.unwrap();
        assert_eq!(response.code, ErrorCode::NoKey);
    }

    #[tokio::test]
    async fn test_unknown_action_reply() {
        let harness = BridgeHarness::start(ScriptedBackend::new());

        let raw = harness.client.call_host("foo", json!({})).await.unwrap();
        let response = ActionResponse::from_value(raw).unwrap();
        assert_eq!(response.code, ErrorCode::UnknownAction);
        assert_eq!(response.message.as_deref(), Some("Unknown action: foo"));
        assert_eq!(harness.binding.stats().unknown, 1);
    }

    #[tokio::test]
    async fn test_extension_action_value_passes_through() {
        let harness = BridgeHarness::with_registry(ScriptedBackend::new(), |registry| {
            registry.with(
                "echo",
                handler_fn(|request: ActionRequest| async move {
                    Ok::<_, HandlerError>(json!({ "echo": request.payload }))
                }),
            )
        });

        let raw = harness
            .client
            .call_host("echo", json!({ "n": 7 }))
            .await
            .unwrap();
        assert_eq!(raw, json!({ "echo": { "n": 7 } }));
    }

    #[tokio::test]
    async fn test_handler_panic_reaches_frame_as_native_error() {
        let harness =
            BridgeHarness::with_registry(ScriptedBackend::new(), |registry| {
                registry.with("explode", Exploding)
            });

        let raw = harness.client.call_host("explode", json!({})).await.unwrap();
        let response = ActionResponse::from_value(raw).unwrap();
        assert_eq!(response.code, ErrorCode::NativeError);
        assert!(response.message.unwrap().contains("keystore exploded"));

        // The binding keeps serving after a panic
        let version = harness.client.get_version().await.unwrap();
        assert!(version.is_success());
        assert_eq!(harness.binding.stats().failed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_when_host_never_answers() {
        let medium = InMemoryMedium::new();
        let host = medium.open_window();
        let frame = medium.open_window();
        let client = BridgeClient::install(&frame, host.id(), &BridgeConfig::default()).unwrap();

        let err = client.get_version().await.unwrap_err();
        assert!(err.is_timeout());
        assert!(matches!(err, ClientError::Timeout { ref action } if action == "getVersion"));
        assert_eq!(client.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_foreign_window_is_ignored() {
        let harness = BridgeHarness::start(ScriptedBackend::new());
        let stranger = harness.medium.open_window();
        let mut replies = stranger.listen(MessageFilter::from_source(harness.host.id()));

        let request = RequestEnvelope::new(
            &ChannelName::default(),
            "stranger-1",
            "getVersion",
            json!({}),
        );
        stranger
            .post_message(harness.host.id(), request.to_value())
            .unwrap();

        tokio::time::timeout(Duration::from_secs(1), async {
            while harness.binding.stats().dropped == 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        assert_eq!(harness.binding.stats().dispatched, 0);
        assert!(replies.try_recv().unwrap().is_none());

        // The bound frame is still served
        assert!(harness.client.get_version().await.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_legacy_sign_action_with_single_message() {
        let harness = BridgeHarness::start(ScriptedBackend::new());

        let client = harness.client.clone();
        let call = tokio::spawn(async move {
            client
                .call_host("signWithActiveDid", json!({ "message": "legacy" }))
                .await
        });

        harness.wait_for_phase(SignPhase::AwaitingPassword).await;
        assert_eq!(harness.coordinator.state().messages, vec!["legacy".to_string()]);
        harness
            .coordinator
            .set_password(TEST_PASSWORD.to_string())
            .unwrap();
        harness.coordinator.confirm().await.unwrap();

        let response = ActionResponse::from_value(call.await.unwrap().unwrap()).unwrap();
        let data: SignatureData = response.data_as().unwrap().unwrap();
        assert_eq!(data.signatures, vec!["sig:legacy".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbind_stops_serving() {
        let harness = BridgeHarness::start(ScriptedBackend::new());
        assert!(harness.client.get_version().await.unwrap().is_success());

        assert!(harness.binding.is_active());
        harness.binding.unbind();

        let err = harness.client.get_version().await.unwrap_err();
        assert!(err.is_timeout());
    }
}
