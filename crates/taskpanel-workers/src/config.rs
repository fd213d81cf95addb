//! Per-worker backend configuration.

use std::time::Duration;

use crate::error::BackendError;

/// Default request timeout for remote backends.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Default completion token limit.
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Connection settings owned by a single worker.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    /// Explicit API key. Takes precedence over any environment variable.
    pub api_key: Option<String>,

    /// Environment variable to read the API key from, overriding the
    /// provider's conventional one.
    pub api_key_env: Option<String>,

    /// Base URL override (OpenAI-compatible gateways, local servers).
    pub base_url: Option<String>,

    /// Per-request timeout.
    pub request_timeout: Duration,

    /// Completion token limit.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: Option<f32>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_key_env: None,
            base_url: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: None,
        }
    }
}

impl BackendConfig {
    /// Builder method to set an explicit API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Builder method to read the API key from a different variable.
    pub fn with_api_key_env(mut self, var: impl Into<String>) -> Self {
        self.api_key_env = Some(var.into());
        self
    }

    /// Builder method to override the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Builder method to set the request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Builder method to set the token limit.
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = tokens;
        self
    }

    /// Builder method to set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Base URL without a trailing slash, falling back to `default`.
    pub fn base_url_or(&self, default: &str) -> String {
        self.base_url
            .as_deref()
            .unwrap_or(default)
            .trim_end_matches('/')
            .to_string()
    }

    /// Resolve the API key: explicit key, then `api_key_env`, then
    /// `default_env`.
    pub fn resolve_api_key(&self, default_env: &str) -> Result<String, BackendError> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        let var = self.api_key_env.as_deref().unwrap_or(default_env);
        match std::env::var(var) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(BackendError::MissingApiKey(var.to_string())),
        }
    }
}
