//! Anthropic Messages API backend.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use taskpanel_core::ProviderKind;

use crate::completion::Completion;
use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::http::{build_client, empty_response, send_json};
use crate::prompt::Prompt;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
const API_VERSION: &str = "2023-06-01";

/// Backend for `POST /v1/messages`.
#[derive(Debug, Clone)]
pub struct AnthropicBackend {
    client: reqwest::Client,
    model: String,
    config: BackendConfig,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [Message<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

impl AnthropicBackend {
    pub fn new(model: impl Into<String>, config: BackendConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(&config)?,
            model: model.into(),
            config,
        })
    }

    fn request_body<'a>(&'a self, prompt: &'a Prompt) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.model,
            max_tokens: self.config.max_tokens,
            system: &prompt.system,
            messages: [Message {
                role: "user",
                content: &prompt.user,
            }],
            temperature: self.config.temperature,
        }
    }
}

/// Concatenate the `text` blocks of a Messages response.
fn response_text(body: &Value) -> Option<String> {
    let text: String = body
        .get("content")?
        .as_array()?
        .iter()
        .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
        .filter_map(|block| block.get("text").and_then(Value::as_str))
        .collect();

    (!text.trim().is_empty()).then_some(text)
}

#[async_trait]
impl Completion for AnthropicBackend {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Anthropic
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, BackendError> {
        let api_key = self.config.resolve_api_key(API_KEY_ENV)?;
        let url = format!("{}/v1/messages", self.config.base_url_or(DEFAULT_BASE_URL));

        let request = self
            .client
            .post(&url)
            .header("x-api-key", api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request_body(prompt));

        let body = send_json("anthropic", request).await?;
        response_text(&body).ok_or_else(|| empty_response("anthropic", &body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionWorker;
    use crate::http::testing::serve_once;
    use serde_json::json;
    use taskpanel_core::Worker;

    fn local_worker(base_url: String) -> CompletionWorker<AnthropicBackend> {
        let config = BackendConfig::default()
            .with_api_key("sk-test")
            .with_base_url(base_url);
        CompletionWorker::new(AnthropicBackend::new("claude-sonnet-4-20250514", config).unwrap())
    }

    #[test]
    fn test_request_body_shape() {
        let backend = AnthropicBackend::new(
            "claude-sonnet-4-20250514",
            BackendConfig::default().with_max_tokens(1024),
        )
        .unwrap();
        let prompt = Prompt {
            system: "sys".to_string(),
            user: "usr".to_string(),
        };

        let body = serde_json::to_value(backend.request_body(&prompt)).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "claude-sonnet-4-20250514",
                "max_tokens": 1024,
                "system": "sys",
                "messages": [{"role": "user", "content": "usr"}]
            })
        );
    }

    #[test]
    fn test_response_text_joins_text_blocks() {
        let body = json!({
            "content": [
                {"type": "text", "text": "{\"a\":"},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": " 1}"}
            ]
        });
        assert_eq!(response_text(&body).as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_empty_content_is_none() {
        assert!(response_text(&json!({"content": []})).is_none());
        assert!(response_text(&json!({"id": "msg_1"})).is_none());
    }

    #[tokio::test]
    async fn test_html_reply_surfaces_as_raw_output() {
        let base = serve_once("text/html", "<html>gateway says hi</html>").await;
        let failure = local_worker(base)
            .process(&json!([{"id": 1}]), "score it")
            .await
            .unwrap_err();

        assert!(failure.message.contains("anthropic returned an unreadable response"));
        assert_eq!(failure.raw_output.as_deref(), Some("<html>gateway says hi</html>"));
    }

    #[tokio::test]
    async fn test_textless_envelope_surfaces_as_raw_output() {
        let envelope = r#"{"id":"msg_1","content":[],"stop_reason":"max_tokens"}"#;
        let base = serve_once("application/json", envelope).await;
        let failure = local_worker(base)
            .process(&json!([{"id": 1}]), "score it")
            .await
            .unwrap_err();

        assert_eq!(failure.message, "anthropic returned an empty response");
        let raw: Value = serde_json::from_str(failure.raw_output.as_deref().unwrap()).unwrap();
        assert_eq!(raw["stop_reason"], "max_tokens");
    }
}
