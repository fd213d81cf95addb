//! Claude Code backend, driven as a one-shot subprocess.
//!
//! Runs `claude --print <prompt> --output-format json` and reads the single
//! result object the CLI prints on exit.

use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use taskpanel_core::ProviderKind;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::completion::Completion;
use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::prompt::Prompt;

/// Default executable, looked up on PATH.
pub const DEFAULT_CLAUDE_PATH: &str = "claude";

/// Backend that shells out to the Claude Code CLI.
#[derive(Debug, Clone)]
pub struct ClaudeCodeBackend {
    /// Path to the Claude CLI executable.
    claude_path: String,

    model: String,

    config: BackendConfig,

    /// Additional environment variables.
    env_vars: Vec<(String, String)>,
}

/// The final object printed by `--output-format json`.
#[derive(Debug, Deserialize)]
struct CliResult {
    #[serde(default)]
    is_error: bool,
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    subtype: Option<String>,
}

impl ClaudeCodeBackend {
    pub fn new(model: impl Into<String>, config: BackendConfig) -> Self {
        // base_url doubles as the executable path for this backend
        let claude_path = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_CLAUDE_PATH.to_string());

        Self {
            claude_path,
            model: model.into(),
            config,
            env_vars: Vec::new(),
        }
    }

    /// Set the path to the Claude CLI.
    pub fn with_claude_path(mut self, path: impl Into<String>) -> Self {
        self.claude_path = path.into();
        self
    }

    /// Add an environment variable.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.push((key.into(), value.into()));
        self
    }

    fn command(&self, prompt: &Prompt) -> Command {
        let mut cmd = Command::new(&self.claude_path);
        cmd.arg("--print")
            .arg(&prompt.user)
            .arg("--output-format")
            .arg("json")
            .arg("--system-prompt")
            .arg(&prompt.system);

        if !self.model.is_empty() {
            cmd.arg("--model").arg(&self.model);
        }

        if let Some(key) = &self.config.api_key {
            cmd.env("ANTHROPIC_API_KEY", key);
        }
        for (key, value) in &self.env_vars {
            cmd.env(key, value);
        }

        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

/// Interpret the CLI's stdout.
fn parse_output(stdout: &str) -> Result<String, BackendError> {
    // The result object is the last non-empty line
    let line = stdout
        .lines()
        .rev()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| BackendError::EmptyResponse {
            provider: "claude-code",
            body: stdout.to_string(),
        })?;

    let parsed: CliResult = serde_json::from_str(line).map_err(|e| BackendError::Process {
        message: format!("unreadable CLI output: {e}"),
        output: Some(stdout.to_string()),
    })?;

    if parsed.is_error {
        return Err(BackendError::Process {
            message: parsed
                .subtype
                .unwrap_or_else(|| "Claude reported an error".to_string()),
            output: parsed.result,
        });
    }

    parsed
        .result
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| BackendError::EmptyResponse {
            provider: "claude-code",
            body: line.to_string(),
        })
}

#[async_trait]
impl Completion for ClaudeCodeBackend {
    fn provider(&self) -> ProviderKind {
        ProviderKind::ClaudeCode
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, BackendError> {
        let mut cmd = self.command(prompt);
        debug!(claude_path = %self.claude_path, prompt_len = prompt.len(), "Spawning Claude process");

        let timeout = self.config.request_timeout;
        let output = tokio::time::timeout(timeout, cmd.output())
            .await
            .map_err(|_| BackendError::Timeout(timeout.as_secs()))??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            warn!(stderr = %stderr.trim(), "Claude stderr");
        }

        if !output.status.success() {
            let exit_code = output.status.code().unwrap_or(-1);
            return Err(BackendError::Process {
                message: format!("Claude exited with code {}", exit_code),
                output: (!stdout.trim().is_empty()).then(|| stdout.to_string()),
            });
        }

        parse_output(&stdout)
    }
}
