//! The runtime wiring: development backend, prompt driver and client together.

#[cfg(test)]
mod tests {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use bb_03_signing_coordinator::{PasswordPrompt, PromptAnswer, PromptPresenter, SignPhase, SigningApi};
    use bridge_runtime::{BridgeRuntime, DevIdentityBackend, RuntimeConfig};
    use ed25519_dalek::{Signature, Verifier, VerifyingKey};
    use parking_lot::Mutex;
    use serde_json::Value;
    use shared_protocol::{ErrorCode, PublicKeyData, SignatureData, VersionData};
    use std::collections::VecDeque;
    use std::sync::Arc;

    /// Answers prompts from a script and records the error each one showed.
    struct ScriptedPresenter {
        answers: Mutex<VecDeque<PromptAnswer>>,
        seen_errors: Mutex<Vec<Option<String>>>,
    }

    impl ScriptedPresenter {
        fn new(answers: Vec<PromptAnswer>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into()),
                seen_errors: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl PromptPresenter for ScriptedPresenter {
        async fn ask_password(&self, prompt: &PasswordPrompt) -> PromptAnswer {
            self.seen_errors.lock().push(prompt.error.clone());
            self.answers
                .lock()
                .pop_front()
                .unwrap_or(PromptAnswer::Cancel)
        }
    }

    fn start(presenter: Arc<ScriptedPresenter>) -> BridgeRuntime {
        let config = RuntimeConfig::default();
        let backend = DevIdentityBackend::from_config(&config.dev_identity).unwrap();
        BridgeRuntime::start(&config, Arc::new(backend), presenter).unwrap()
    }

    fn verifying_key(jwk: &str) -> VerifyingKey {
        let jwk: Value = serde_json::from_str(jwk).unwrap();
        assert_eq!(jwk["kty"], "OKP");
        assert_eq!(jwk["crv"], "Ed25519");
        let x: [u8; 32] = URL_SAFE_NO_PAD
            .decode(jwk["x"].as_str().unwrap())
            .unwrap()
            .try_into()
            .unwrap();
        VerifyingKey::from_bytes(&x).unwrap()
    }

    #[tokio::test]
    async fn test_signatures_verify_against_published_key() {
        let presenter = ScriptedPresenter::new(vec![
            PromptAnswer::Password("wrong".into()),
            PromptAnswer::Password("bucky".into()),
        ]);
        let runtime = start(presenter.clone());
        let client = runtime.client().clone();

        let version: VersionData = client.get_version().await.unwrap().data_as().unwrap().unwrap();
        assert_eq!(version.version, shared_protocol::PROTOCOL_VERSION);

        let key: PublicKeyData = client
            .get_public_key()
            .await
            .unwrap()
            .data_as()
            .unwrap()
            .unwrap();
        let key = verifying_key(&key.key);

        let response = client
            .sign_with_active_identity(&["hello", "world"])
            .await
            .unwrap();
        assert_eq!(response.code, ErrorCode::Success);
        let data: SignatureData = response.data_as().unwrap().unwrap();
        assert_eq!(data.signatures.len(), 2);

        for (message, signature) in ["hello", "world"].iter().zip(&data.signatures) {
            let raw: [u8; 64] = hex::decode(signature).unwrap().try_into().unwrap();
            assert!(key
                .verify(message.as_bytes(), &Signature::from_bytes(&raw))
                .is_ok());
        }

        // First prompt clean, second shows the rejection
        let errors = presenter.seen_errors.lock().clone();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].is_none());
        assert!(errors[1].is_some());

        let stats = runtime.dispatch_stats().unwrap();
        assert_eq!(stats.dispatched, 3);
        assert_eq!(stats.replied, 3);
        runtime.shutdown();
    }

    #[tokio::test]
    async fn test_cancel_from_prompt() {
        let presenter = ScriptedPresenter::new(vec![PromptAnswer::Cancel]);
        let runtime = start(presenter);

        let response = runtime
            .client()
            .sign_with_active_identity(&["hello"])
            .await
            .unwrap();
        assert_eq!(response.code, ErrorCode::Cancelled);
        assert_eq!(runtime.coordinator().state().phase, SignPhase::Idle);
        runtime.shutdown();
    }

    #[tokio::test]
    async fn test_shutdown_abandons_open_request() {
        struct NeverAnswers;

        #[async_trait::async_trait]
        impl PromptPresenter for NeverAnswers {
            async fn ask_password(&self, _prompt: &PasswordPrompt) -> PromptAnswer {
                std::future::pending().await
            }
        }

        let config = RuntimeConfig::default();
        let backend = DevIdentityBackend::from_config(&config.dev_identity).unwrap();
        let runtime = BridgeRuntime::start(&config, Arc::new(backend), Arc::new(NeverAnswers)).unwrap();

        let client = runtime.client().clone();
        let call = tokio::spawn(async move { client.sign_with_active_identity(&["hello"]).await });

        let mut states = runtime.coordinator().subscribe();
        states
            .wait_for(|state| state.phase == SignPhase::AwaitingPassword)
            .await
            .unwrap();
        drop(states);

        runtime.shutdown();

        // Either the abandon reply arrived first or the client went away with it
        match call.await.unwrap() {
            Ok(response) => {
                assert_eq!(response.code, ErrorCode::NativeError);
                assert_eq!(response.message.as_deref(), Some("Sign request abandoned"));
            }
            Err(e) => assert!(!e.is_timeout()),
        }
    }
}
