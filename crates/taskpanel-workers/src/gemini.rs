//! Google Gemini `generateContent` backend.

use async_trait::async_trait;
use serde_json::{json, Value};
use taskpanel_core::ProviderKind;

use crate::completion::Completion;
use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::http::{build_client, empty_response, send_json};
use crate::prompt::Prompt;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    model: String,
    config: BackendConfig,
}

impl GeminiBackend {
    pub fn new(model: impl Into<String>, config: BackendConfig) -> Result<Self, BackendError> {
        Ok(Self {
            client: build_client(&config)?,
            model: model.into(),
            config,
        })
    }

    fn request_body(&self, prompt: &Prompt) -> Value {
        let mut generation = json!({
            "maxOutputTokens": self.config.max_tokens,
            "responseMimeType": "application/json",
        });
        if let Some(temperature) = self.config.temperature {
            generation["temperature"] = json!(temperature);
        }

        json!({
            "systemInstruction": {"parts": [{"text": prompt.system}]},
            "contents": [{"role": "user", "parts": [{"text": prompt.user}]}],
            "generationConfig": generation,
        })
    }
}

fn response_text(body: &Value) -> Option<String> {
    let text: String = body
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    (!text.trim().is_empty()).then_some(text)
}

#[async_trait]
impl Completion for GeminiBackend {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String, BackendError> {
        let api_key = self.config.resolve_api_key(API_KEY_ENV)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url_or(DEFAULT_BASE_URL),
            self.model
        );

        let request = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&self.request_body(prompt));

        let body = send_json("gemini", request).await?;
        response_text(&body).ok_or_else(|| empty_response("gemini", &body))
    }
}
