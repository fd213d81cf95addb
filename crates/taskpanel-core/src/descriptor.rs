//! Worker identity and provider kind types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{PanelError, WorkerRole};

/// Kind of backend a worker is built from.
///
/// This is the closed set of backends the workers crate knows how to
/// construct. The string forms are what rosters and `add_worker` use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "openrouter")]
    OpenRouter,
    Ollama,
    Gemini,
    ClaudeCode,
    Echo,
}

impl ProviderKind {
    /// Get all provider kinds.
    pub fn all() -> [ProviderKind; 7] {
        [
            ProviderKind::Anthropic,
            ProviderKind::OpenAi,
            ProviderKind::OpenRouter,
            ProviderKind::Ollama,
            ProviderKind::Gemini,
            ProviderKind::ClaudeCode,
            ProviderKind::Echo,
        ]
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Ollama => "ollama",
            ProviderKind::Gemini => "gemini",
            ProviderKind::ClaudeCode => "claude-code",
            ProviderKind::Echo => "echo",
        }
    }

    /// Whether the backend needs an API key to run.
    pub fn requires_api_key(&self) -> bool {
        matches!(
            self,
            ProviderKind::Anthropic
                | ProviderKind::OpenAi
                | ProviderKind::OpenRouter
                | ProviderKind::Gemini
        )
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = PanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "openai" | "open-ai" => Ok(ProviderKind::OpenAi),
            "openrouter" | "open-router" => Ok(ProviderKind::OpenRouter),
            "ollama" => Ok(ProviderKind::Ollama),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "claude-code" | "claudecode" => Ok(ProviderKind::ClaudeCode),
            "echo" => Ok(ProviderKind::Echo),
            _ => Err(PanelError::UnknownProviderKind(s.to_string())),
        }
    }
}

/// Identity of a registered worker.
///
/// Names are human-assigned and not required to be unique; two entries
/// with the same name coexist as distinct registrations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerDescriptor {
    /// Human-assigned worker name.
    pub name: String,

    /// Model identifier (e.g., "claude-sonnet-4-20250514", "gpt-4o").
    pub model: String,

    /// Provider identifier (e.g., "anthropic", "openai").
    pub provider: String,

    /// Round this worker takes part in.
    pub role: WorkerRole,
}

impl WorkerDescriptor {
    /// Create a new task-worker descriptor.
    pub fn new(
        name: impl Into<String>,
        provider: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            provider: provider.into(),
            role: WorkerRole::Task,
        }
    }

    /// Builder method to set the role.
    pub fn with_role(mut self, role: WorkerRole) -> Self {
        self.role = role;
        self
    }

    /// Builder method to flag this worker as a reviewer.
    pub fn reviewer(self) -> Self {
        self.with_role(WorkerRole::Reviewer)
    }

    /// Returns true if this worker runs in the review round.
    pub fn is_reviewer(&self) -> bool {
        self.role.is_reviewer()
    }
}

impl fmt::Display for WorkerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}/{}, {})", self.name, self.provider, self.model, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_round_trip_strings() {
        for kind in ProviderKind::all() {
            assert_eq!(kind.as_str().parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_provider_kind_aliases() {
        assert_eq!(
            "Open_Router".parse::<ProviderKind>().unwrap(),
            ProviderKind::OpenRouter
        );
        assert_eq!(
            "claude_code".parse::<ProviderKind>().unwrap(),
            ProviderKind::ClaudeCode
        );
    }

    #[test]
    fn test_unknown_provider_kind() {
        let err = "mystery-llm".parse::<ProviderKind>().unwrap_err();
        assert!(matches!(err, PanelError::UnknownProviderKind(ref k) if k == "mystery-llm"));
    }

    #[test]
    fn test_provider_kind_serde_matches_as_str() {
        for kind in ProviderKind::all() {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_descriptor_builder() {
        let d = WorkerDescriptor::new("critic", "anthropic", "claude-sonnet-4-20250514").reviewer();
        assert!(d.is_reviewer());
        assert_eq!(d.provider, "anthropic");
        assert_eq!(
            d.to_string(),
            "critic (anthropic/claude-sonnet-4-20250514, reviewer)"
        );
    }
}
