//! Runtime configuration: optional JSON file, then `BB_*` environment
//! overrides, then validation.

use bridge_telemetry::TelemetryConfig;
use serde::Deserialize;
use shared_protocol::{BridgeConfig, BridgeText, ConfigError};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value:?}")]
    Env { key: &'static str, value: String },

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

/// Development identity served by [`DevIdentityBackend`](crate::DevIdentityBackend).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DevIdentityConfig {
    /// Active identity; `None` simulates a host with nothing selected
    pub identity: Option<String>,
    /// Password that unlocks the key
    pub password: String,
    /// 32-byte Ed25519 seed, hex. Derived from the identity when absent.
    pub seed_hex: Option<String>,
    /// Whether the identity exposes its public key
    pub expose_public_key: bool,
}

impl Default for DevIdentityConfig {
    fn default() -> Self {
        Self {
            identity: Some("did:bucky:dev".to_string()),
            password: "bucky".to_string(),
            seed_hex: None,
            expose_public_key: true,
        }
    }
}

/// Everything the runtime needs.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub bridge: BridgeConfig,
    pub telemetry: TelemetryConfig,
    pub text: BridgeText,
    pub dev_identity: DevIdentityConfig,
}

impl RuntimeConfig {
    /// Load from `path` (if any) and the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `BB_CHANNEL`: base channel name
    /// - `BB_ID_PREFIX`: request id prefix
    /// - `BB_TIMEOUT_MS`: default request timeout
    /// - `BB_LOG_LEVEL`, `BB_JSON_LOGS`: logging
    /// - `BB_DEV_IDENTITY`, `BB_DEV_PASSWORD`, `BB_DEV_SEED`: development identity
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
                serde_json::from_str(&raw)?
            }
            None => Self::default(),
        };

        config.apply_env(lookup)?;
        config.bridge.validate()?;
        Ok(config)
    }

    fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(channel) = lookup("BB_CHANNEL") {
            self.bridge.channel = channel;
        }
        if let Some(prefix) = lookup("BB_ID_PREFIX") {
            self.bridge.id_prefix = prefix;
        }
        if let Some(raw) = lookup("BB_TIMEOUT_MS") {
            self.bridge.timeouts.default_ms = raw.parse().map_err(|_| ConfigLoadError::Env {
                key: "BB_TIMEOUT_MS",
                value: raw.clone(),
            })?;
        }
        if let Some(level) = lookup("BB_LOG_LEVEL") {
            self.telemetry.log_level = level;
        }
        if let Some(raw) = lookup("BB_JSON_LOGS") {
            self.telemetry.json_logs = raw.eq_ignore_ascii_case("true") || raw == "1";
        }
        if let Some(identity) = lookup("BB_DEV_IDENTITY") {
            self.dev_identity.identity = (!identity.is_empty()).then_some(identity);
        }
        if let Some(password) = lookup("BB_DEV_PASSWORD") {
            self.dev_identity.password = password;
        }
        if let Some(seed) = lookup("BB_DEV_SEED") {
            self.dev_identity.seed_hex = Some(seed);
        }
        Ok(())
    }
}
