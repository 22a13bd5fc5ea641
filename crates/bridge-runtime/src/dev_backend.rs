//! Development identity backend.
//!
//! One identity, one Ed25519 key, one password. The password is kept only as
//! a SHA-256 digest and compared in constant time. Signatures are hex-encoded
//! Ed25519 signatures over the UTF-8 bytes of each message; the public key is
//! published as an OKP JWK.

use crate::config::DevIdentityConfig;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bb_03_signing_coordinator::{ActiveIdentity, BackendError, BackendErrorCode, IdentityBackend};
use ed25519_dalek::{Signer, SigningKey};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::debug;

pub struct DevIdentityBackend {
    identity: Option<String>,
    signing_key: SigningKey,
    password_digest: [u8; 32],
    expose_public_key: bool,
}

impl DevIdentityBackend {
    pub fn from_config(config: &DevIdentityConfig) -> Result<Self, BackendError> {
        let seed = match &config.seed_hex {
            Some(seed_hex) => decode_seed(seed_hex)?,
            // Stable per identity so restarts keep the same key
            None => digest(config.identity.as_deref().unwrap_or_default()),
        };

        Ok(Self {
            identity: config.identity.clone(),
            signing_key: SigningKey::from_bytes(&seed),
            password_digest: digest(&config.password),
            expose_public_key: config.expose_public_key,
        })
    }

    /// Public key as a JWK (`kty: OKP`, `crv: Ed25519`).
    pub fn public_key_jwk(&self) -> Value {
        let public = self.signing_key.verifying_key().to_bytes();
        json!({
            "kty": "OKP",
            "crv": "Ed25519",
            "x": URL_SAFE_NO_PAD.encode(public),
        })
    }

    fn password_matches(&self, password: &str) -> bool {
        let candidate = digest(password);
        candidate
            .as_slice()
            .ct_eq(self.password_digest.as_slice())
            .into()
    }
}

#[async_trait::async_trait]
impl IdentityBackend for DevIdentityBackend {
    async fn active_identity(&self) -> Result<Option<ActiveIdentity>, BackendError> {
        Ok(self.identity.as_ref().map(|id| ActiveIdentity {
            id: id.clone(),
            public_key: self.expose_public_key.then(|| self.public_key_jwk()),
        }))
    }

    async fn sign_with_active_identity(
        &self,
        password: &str,
        messages: &[String],
    ) -> Result<Vec<String>, BackendError> {
        if self.identity.is_none() {
            return Err(BackendError::new(
                BackendErrorCode::NotFound,
                "no active identity",
            ));
        }
        if messages.is_empty() {
            return Err(BackendError::new(
                BackendErrorCode::SignMessageRequired,
                "at least one message is required",
            ));
        }
        if !self.password_matches(password) {
            debug!("Development backend rejected password");
            return Err(BackendError::invalid_password());
        }

        Ok(messages
            .iter()
            .map(|message| hex::encode(self.signing_key.sign(message.as_bytes()).to_bytes()))
            .collect())
    }
}

fn digest(input: &str) -> [u8; 32] {
    Sha256::digest(input.as_bytes()).into()
}

fn decode_seed(seed_hex: &str) -> Result<[u8; 32], BackendError> {
    let bytes = hex::decode(seed_hex.trim()).map_err(|e| {
        BackendError::new(BackendErrorCode::KeyDerivationFailure, format!("bad seed: {e}"))
    })?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        BackendError::new(
            BackendErrorCode::KeyDerivationFailure,
            format!("seed must be 32 bytes, got {}", bytes.len()),
        )
    })
}
