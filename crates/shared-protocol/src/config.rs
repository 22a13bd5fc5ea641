//! Bridge configuration with validation.

use crate::actions::SIGN_WITH_ACTIVE_IDENTITY;
use crate::envelope::{ChannelName, RESULT_SUFFIX};
use crate::DEFAULT_CHANNEL;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Default client-side wait for a reply.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Configuration shared by the client library and the host dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Base channel name; replies use `<channel>-result`
    pub channel: String,
    /// Prefix of generated request ids
    pub id_prefix: String,
    /// Client-side timeout policy
    pub timeouts: TimeoutConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            id_prefix: "bucky".to_string(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl BridgeConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel.trim().is_empty() {
            return Err(ConfigError::InvalidChannel("channel cannot be empty".into()));
        }

        // A base ending in the reply suffix would collide with another
        // protocol's reply tag.
        if self.channel.ends_with(RESULT_SUFFIX) {
            return Err(ConfigError::InvalidChannel(format!(
                "channel cannot end with '{}'",
                RESULT_SUFFIX
            )));
        }

        if self.id_prefix.is_empty() {
            return Err(ConfigError::Invalid("id_prefix cannot be empty".into()));
        }

        if self.timeouts.default_ms == 0 {
            return Err(ConfigError::InvalidTimeout(
                "default timeout cannot be 0".into(),
            ));
        }

        if let Some((action, _)) = self
            .timeouts
            .action_overrides_ms
            .iter()
            .find(|(_, ms)| **ms == 0)
        {
            return Err(ConfigError::InvalidTimeout(format!(
                "timeout for '{}' cannot be 0",
                action
            )));
        }

        Ok(())
    }

    pub fn channel_name(&self) -> ChannelName {
        ChannelName::new(self.channel.clone())
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: BridgeConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }
}

/// Per-action client timeout policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Timeout applied to actions without an override
    pub default_ms: u64,
    /// Actions that never time out (flows waiting on the user)
    pub no_timeout_actions: Vec<String>,
    /// Per-action timeout overrides
    pub action_overrides_ms: HashMap<String, u64>,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default_ms: DEFAULT_TIMEOUT_MS,
            no_timeout_actions: vec![SIGN_WITH_ACTIVE_IDENTITY.to_string()],
            action_overrides_ms: HashMap::new(),
        }
    }
}

impl TimeoutConfig {
    /// Timeout for `action`, or `None` if it waits indefinitely.
    pub fn timeout_for(&self, action: &str) -> Option<Duration> {
        if self.no_timeout_actions.iter().any(|exempt| exempt == action) {
            return None;
        }
        let ms = self
            .action_overrides_ms
            .get(action)
            .copied()
            .unwrap_or(self.default_ms);
        Some(Duration::from_millis(ms))
    }

    pub fn default_timeout(&self) -> Duration {
        Duration::from_millis(self.default_ms)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid channel name
    #[error("invalid channel: {0}")]
    InvalidChannel(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// Configuration document could not be parsed
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
