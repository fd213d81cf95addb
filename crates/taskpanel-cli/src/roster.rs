//! Worker roster file loading.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use taskpanel_core::WorkerRole;
use taskpanel_workers::BackendConfig;

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to read roster {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid roster {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// One worker in the roster file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub role: WorkerRole,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl RosterEntry {
    /// Backend settings for this entry, on top of the defaults.
    pub fn backend_config(&self) -> BackendConfig {
        let mut config = BackendConfig::default();
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url);
        }
        if let Some(var) = &self.api_key_env {
            config = config.with_api_key_env(var);
        }
        if let Some(tokens) = self.max_tokens {
            config = config.with_max_tokens(tokens);
        }
        if let Some(temperature) = self.temperature {
            config = config.with_temperature(temperature);
        }
        config
    }
}

pub fn parse_roster(text: &str) -> Result<Vec<RosterEntry>, serde_json::Error> {
    serde_json::from_str(text)
}

pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>, RosterError> {
    let text = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_roster(&text).map_err(|source| RosterError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roster() {
        let roster = parse_roster(
            r#"[
                {"name": "claude", "provider": "anthropic", "model": "claude-sonnet-4-20250514"},
                {"name": "local", "provider": "ollama", "model": "llama3",
                 "base_url": "http://gpu-box:11434/v1", "max_tokens": 2048},
                {"name": "judge", "provider": "openai", "model": "gpt-4o", "role": "reviewer",
                 "api_key_env": "JUDGE_KEY", "temperature": 0.0}
            ]"#,
        )
        .unwrap();

        assert_eq!(roster.len(), 3);
        assert_eq!(roster[0].role, WorkerRole::Task);
        assert_eq!(roster[2].role, WorkerRole::Reviewer);

        let local = roster[1].backend_config();
        assert_eq!(local.base_url.as_deref(), Some("http://gpu-box:11434/v1"));
        assert_eq!(local.max_tokens, 2048);

        let judge = roster[2].backend_config();
        assert_eq!(judge.api_key_env.as_deref(), Some("JUDGE_KEY"));
        assert_eq!(judge.temperature, Some(0.0));
        assert_eq!(judge.max_tokens, taskpanel_workers::DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_rejects_unknown_role() {
        let err = parse_roster(r#"[{"name": "x", "provider": "echo", "model": "m", "role": "boss"}]"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = load_roster(Path::new("/nonexistent/roster.json")).unwrap_err();
        assert!(matches!(err, RosterError::Io { .. }));
    }
}
