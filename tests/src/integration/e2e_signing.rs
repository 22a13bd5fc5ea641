//! Sign requests from the frame, answered through the host's password prompt.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{BridgeHarness, ScriptedBackend, TEST_IDENTITY, TEST_PASSWORD};
    use bb_02_host_dispatcher::{HandlerRegistry, HostDispatcher};
    use bb_03_signing_coordinator::{
        register_identity_actions, BackendError, BackendErrorCode, ConfirmOutcome,
        CoordinatorError, SignPhase, SigningApi,
    };
    use shared_protocol::{BridgeText, ChannelName, ErrorCode, SignatureData, PROTOCOL_VERSION};
    use std::sync::Arc;
    use tokio_test::{assert_pending, task};

    #[tokio::test]
    async fn test_wrong_password_then_right() {
        let harness = BridgeHarness::start(ScriptedBackend::new());
        let text = BridgeText::default();

        let mut call = task::spawn(harness.client.sign_with_active_identity(&["a", "b"]));
        assert_pending!(call.poll());

        harness.wait_for_phase(SignPhase::AwaitingPassword).await;
        let state = harness.coordinator.state();
        assert_eq!(state.identity.as_deref(), Some(TEST_IDENTITY));
        assert_eq!(state.messages, vec!["a".to_string(), "b".to_string()]);

        harness.coordinator.set_password("guess".into()).unwrap();
        assert_eq!(
            harness.coordinator.confirm().await.unwrap(),
            ConfirmOutcome::InvalidPassword
        );

        // Prompt stays open with an error and a cleared input
        let state = harness.coordinator.state();
        assert_eq!(state.phase, SignPhase::AwaitingPassword);
        assert_eq!(state.error.as_deref(), Some(text.invalid_password.as_str()));
        assert!(state.password.is_empty());
        assert_pending!(call.poll());

        harness
            .coordinator
            .set_password(TEST_PASSWORD.to_string())
            .unwrap();
        assert_eq!(
            harness.coordinator.confirm().await.unwrap(),
            ConfirmOutcome::Signed
        );

        let response = call.await.unwrap();
        assert_eq!(response.code, ErrorCode::Success);
        let data: SignatureData = response.data_as().unwrap().unwrap();
        assert_eq!(data.signatures, vec!["sig:a".to_string(), "sig:b".to_string()]);

        assert_eq!(harness.backend.sign_calls(), 2);
        assert_eq!(harness.coordinator.state().phase, SignPhase::Idle);
    }

    #[tokio::test]
    async fn test_second_request_is_busy_until_first_settles() {
        let harness = BridgeHarness::start(ScriptedBackend::new());

        let client = harness.client.clone();
        let first = tokio::spawn(async move { client.sign_with_active_identity(&["first"]).await });
        harness.wait_for_phase(SignPhase::AwaitingPassword).await;

        let second = harness
            .client
            .sign_with_active_identity(&["second"])
            .await
            .unwrap();
        assert_eq!(second.code, ErrorCode::Busy);
        assert_eq!(harness.coordinator.state().messages, vec!["first".to_string()]);

        harness.coordinator.cancel().unwrap();
        let first = first.await.unwrap().unwrap();
        assert_eq!(first.code, ErrorCode::Cancelled);
        assert_eq!(first.message.as_deref(), Some("Cancelled"));

        // Nothing open any more
        assert_eq!(harness.coordinator.cancel(), Err(CoordinatorError::NoPrompt));

        // A fresh request is accepted again
        let client = harness.client.clone();
        let third = tokio::spawn(async move { client.sign_with_active_identity(&["third"]).await });
        harness.wait_for_phase(SignPhase::AwaitingPassword).await;
        harness.coordinator.cancel().unwrap();
        assert_eq!(third.await.unwrap().unwrap().code, ErrorCode::Cancelled);
    }

    #[tokio::test]
    async fn test_blank_messages_never_prompt() {
        let harness = BridgeHarness::start(ScriptedBackend::new());

        let empty: [&str; 0] = [];
        let response = harness
            .client
            .sign_with_active_identity(&empty)
            .await
            .unwrap();
        assert_eq!(response.code, ErrorCode::NoMessage);

        let response = harness
            .client
            .sign_with_active_identity(&["", "   "])
            .await
            .unwrap();
        assert_eq!(response.code, ErrorCode::NoMessage);

        assert_eq!(harness.coordinator.state().phase, SignPhase::Idle);
        assert_eq!(harness.backend.sign_calls(), 0);
    }

    #[tokio::test]
    async fn test_no_active_identity() {
        let harness = BridgeHarness::start(ScriptedBackend::without_identity());

        let response = harness
            .client
            .sign_with_active_identity(&["hello"])
            .await
            .unwrap();
        assert_eq!(response.code, ErrorCode::NoActiveIdentity);
        assert_eq!(harness.coordinator.state().phase, SignPhase::Idle);
    }

    #[tokio::test]
    async fn test_backend_failure_is_native_error() {
        let harness = BridgeHarness::start(ScriptedBackend::new());
        harness.backend.fail_with(BackendError::new(
            BackendErrorCode::Internal,
            "keystore locked",
        ));

        let client = harness.client.clone();
        let call = tokio::spawn(async move { client.sign_with_active_identity(&["hello"]).await });
        harness.wait_for_phase(SignPhase::AwaitingPassword).await;

        harness
            .coordinator
            .set_password(TEST_PASSWORD.to_string())
            .unwrap();
        assert_eq!(
            harness.coordinator.confirm().await.unwrap(),
            ConfirmOutcome::Failed
        );

        let response = call.await.unwrap().unwrap();
        assert_eq!(response.code, ErrorCode::NativeError);
        assert_eq!(response.message.as_deref(), Some("keystore locked"));
        assert_eq!(harness.coordinator.state().phase, SignPhase::Idle);
    }

    #[tokio::test]
    async fn test_abandon_resolves_waiting_frame() {
        let harness = BridgeHarness::start(ScriptedBackend::new());

        let client = harness.client.clone();
        let call = tokio::spawn(async move { client.sign_with_active_identity(&["hello"]).await });
        harness.wait_for_phase(SignPhase::AwaitingPassword).await;

        assert!(harness.coordinator.abandon());
        assert!(!harness.coordinator.abandon());

        let response = call.await.unwrap().unwrap();
        assert_eq!(response.code, ErrorCode::NativeError);
        assert_eq!(response.message.as_deref(), Some("Sign request abandoned"));
    }

    #[tokio::test]
    async fn test_prompt_actions_without_request() {
        let harness = BridgeHarness::start(ScriptedBackend::new());

        assert_eq!(
            harness.coordinator.set_password("x".into()),
            Err(CoordinatorError::NoPrompt)
        );
        assert_eq!(
            harness.coordinator.confirm().await,
            Err(CoordinatorError::NoPrompt)
        );
    }

    #[tokio::test]
    async fn test_unbind_with_pending_sign_frees_the_prompt() {
        let harness = BridgeHarness::start(ScriptedBackend::new());

        let client = harness.client.clone();
        let stranded = tokio::spawn(async move { client.sign_with_active_identity(&["old"]).await });
        harness.wait_for_phase(SignPhase::AwaitingPassword).await;

        // Tearing down the binding aborts the handler holding the prompt
        harness.binding.unbind();
        let _ = harness
            .coordinator
            .subscribe()
            .wait_for(|state| state.phase == SignPhase::Idle)
            .await;
        assert_eq!(
            harness.coordinator.set_password("x".into()),
            Err(CoordinatorError::NoPrompt)
        );

        let registry = register_identity_actions(
            HandlerRegistry::new(),
            harness.coordinator.clone(),
            PROTOCOL_VERSION,
        );
        let _binding = HostDispatcher::bind(
            &harness.host,
            harness.frame.id(),
            Arc::new(registry),
            ChannelName::default(),
        );

        let client = harness.client.clone();
        let call = tokio::spawn(async move { client.sign_with_active_identity(&["new"]).await });
        let _ = harness
            .coordinator
            .subscribe()
            .wait_for(|state| state.phase == SignPhase::AwaitingPassword)
            .await;
        assert_eq!(harness.coordinator.state().messages, vec!["new".to_string()]);

        harness
            .coordinator
            .set_password(TEST_PASSWORD.to_string())
            .unwrap();
        assert_eq!(
            harness.coordinator.confirm().await.unwrap(),
            ConfirmOutcome::Signed
        );

        let response = call.await.unwrap().unwrap();
        assert_eq!(response.code, ErrorCode::Success);
        let data: SignatureData = response.data_as().unwrap().unwrap();
        assert_eq!(data.signatures, vec!["sig:new".to_string()]);

        stranded.abort();
    }
}
