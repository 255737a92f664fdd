//! Common configuration structures for analysis backends.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{AnalysisError, Result};

/// Default endpoint for the remote analysis API.
pub const DEFAULT_REMOTE_BASE_URL: &str = "https://api.anthropic.com";

/// Model the remote backend requests by default.
pub const DEFAULT_REMOTE_MODEL: &str = "claude-sonnet-4-5-20250929";

/// Environment variables consulted for the remote API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["CLAUDE_API_KEY", "ANTHROPIC_API_KEY"];

/// Configuration for the remote analysis backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Base URL for the API.
    pub base_url: String,

    /// Model name/identifier.
    pub model: String,

    /// Request timeout duration.
    #[serde(default = "default_remote_timeout")]
    pub timeout: Duration,

    /// Output token budget for one analysis response.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl RemoteConfig {
    /// Create a new remote configuration with default endpoint and model.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_REMOTE_BASE_URL.to_string(),
            model: DEFAULT_REMOTE_MODEL.to_string(),
            timeout: default_remote_timeout(),
            max_output_tokens: default_max_output_tokens(),
        }
    }

    /// Create configuration from the environment, trying each variable in
    /// [`API_KEY_ENV_VARS`] in order.
    pub fn from_env() -> Result<Self> {
        for var in API_KEY_ENV_VARS {
            if let Ok(api_key) = std::env::var(var) {
                if !api_key.is_empty() {
                    return Ok(Self::new(api_key));
                }
            }
        }
        Err(AnalysisError::ApiKeyNotFound(format!(
            "set one of: {}",
            API_KEY_ENV_VARS.join(", ")
        )))
    }

    /// Whether any of the key variables is set, without building a config.
    pub fn credential_present() -> bool {
        API_KEY_ENV_VARS
            .iter()
            .any(|var| std::env::var(var).map(|v| !v.is_empty()).unwrap_or(false))
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the output token budget.
    pub fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

/// Configuration for the local inference engine client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalEngineConfig {
    /// Base URL of the llama.cpp-compatible server.
    ///
    /// Examples:
    /// - llama.cpp: "http://127.0.0.1:8080"
    /// - LM Studio: "http://localhost:1234/v1"
    pub base_url: String,

    /// Model name/identifier the server should route to.
    pub model: String,

    /// Request timeout duration. Local vision inference is slow on CPU, so
    /// this defaults well above the remote timeout.
    #[serde(default = "default_local_timeout")]
    pub timeout: Duration,
}

impl LocalEngineConfig {
    /// Create a new local engine configuration.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            timeout: default_local_timeout(),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for LocalEngineConfig {
    fn default() -> Self {
        Self::new("http://127.0.0.1:8080", "qwen2-vl")
    }
}

fn default_remote_timeout() -> Duration {
    Duration::from_secs(120)
}

fn default_local_timeout() -> Duration {
    Duration::from_secs(300)
}

fn default_max_output_tokens() -> u32 {
    8192
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_config_builder() {
        let config = RemoteConfig::new("test-key")
            .with_base_url("https://proxy.example")
            .with_model("claude-test")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "https://proxy.example");
        assert_eq!(config.model, "claude-test");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.max_output_tokens, 8192);
    }

    #[test]
    fn local_config_defaults() {
        let config = LocalEngineConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8080");
        assert_eq!(config.timeout, Duration::from_secs(300));
    }
}
