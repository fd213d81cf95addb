//! OpenAI-compatible chat completions backend.
//!
//! Serves OpenAI itself, OpenRouter and a local Ollama server, which all
//! speak the same `/chat/completions` dialect.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use taskpanel_core::ProviderKind;

use crate::completion::Completion;
use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::http::{build_client, empty_response, send_json};
use crate::prompt::Prompt;

/// Backend for `POST {base}/chat/completions`.
#[derive(Debug, Clone)]
pub struct OpenAiBackend {
    client: reqwest::Client,
    kind: ProviderKind,
    model: String,
    config: BackendConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl OpenAiBackend {
    /// Create a backend for one of the OpenAI-compatible providers.
    ///
    /// Any other `kind` is treated as plain OpenAI.
    pub fn new(
        kind: ProviderKind,
        model: impl Into<String>,
        config: BackendConfig,
    ) -> Result<Self, BackendError> {
        let kind = match kind {
            ProviderKind::OpenRouter | ProviderKind::Ollama => kind,
            _ => ProviderKind::OpenAi,
        };
        Ok(Self {
            client: build_client(&config)?,
            kind,
            model: model.into(),
            config,
        })
    }

    fn default_base_url(&self) -> &'static str {
        match self.kind {
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1",
            ProviderKind::Ollama => "http://localhost:11434/v1",
            _ => "https://api.openai.com/v1",
        }
    }

    fn api_key_env(&self) -> Option<&'static str> {
        match self.kind {
            ProviderKind::OpenRouter => Some("OPENROUTER_API_KEY"),
            ProviderKind::Ollama => None,
            _ => Some("OPENAI_API_KEY"),
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a Prompt) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        }
    }
}

fn response_text(body: &Value) -> Option<String> {
    let text = body
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()?;

    (!text.trim().is_empty()).then(|| text.to_string())
}

#[async_trait]
impl Completion for OpenAiBackend {
    fn provider(&self) -> ProviderKind {
        self.kind
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, BackendError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url_or(self.default_base_url())
        );

        let mut request = self.client.post(&url).json(&self.request_body(prompt));

        match self.api_key_env() {
            Some(env) => request = request.bearer_auth(self.config.resolve_api_key(env)?),
            // Local servers ignore auth, but accept an explicit key if given
            None => {
                if let Some(key) = &self.config.api_key {
                    request = request.bearer_auth(key);
                }
            }
        }

        let body = send_json(self.kind.as_str(), request).await?;
        response_text(&body).ok_or_else(|| empty_response(self.kind.as_str(), &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_provider_defaults() {
        let ollama = OpenAiBackend::new(ProviderKind::Ollama, "llama3", BackendConfig::default()).unwrap();
        assert_eq!(ollama.default_base_url(), "http://localhost:11434/v1");
        assert!(ollama.api_key_env().is_none());

        let router =
            OpenAiBackend::new(ProviderKind::OpenRouter, "x/y", BackendConfig::default()).unwrap();
        assert_eq!(router.api_key_env(), Some("OPENROUTER_API_KEY"));

        let fallback = OpenAiBackend::new(ProviderKind::Echo, "gpt-4o", BackendConfig::default()).unwrap();
        assert_eq!(fallback.provider(), ProviderKind::OpenAi);
    }

    #[test]
    fn test_request_body_shape() {
        let backend = OpenAiBackend::new(
            ProviderKind::OpenAi,
            "gpt-4o",
            BackendConfig::default().with_max_tokens(512).with_temperature(0.5),
        )
        .unwrap();
        let prompt = Prompt {
            system: "sys".to_string(),
            user: "usr".to_string(),
        };

        let body = serde_json::to_value(backend.request_body(&prompt)).unwrap();
        assert_eq!(body["messages"][0], json!({"role": "system", "content": "sys"}));
        assert_eq!(body["messages"][1], json!({"role": "user", "content": "usr"}));
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["temperature"], 0.5);
    }

    #[test]
    fn test_response_text() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "{}"}}]});
        assert_eq!(response_text(&body).as_deref(), Some("{}"));
        assert!(response_text(&json!({"choices": []})).is_none());
    }
}
