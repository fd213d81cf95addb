//! Adapter from a text-completion backend to the `Worker` contract.

use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use taskpanel_core::{ProviderKind, Worker, WorkerFailure, WorkerReply};
use tracing::{debug, warn};

use crate::error::BackendError;
use crate::extract::parse_analysis;
use crate::prompt::Prompt;

/// A backend that turns a rendered prompt into raw model text.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Which provider this backend talks to.
    fn provider(&self) -> ProviderKind;

    /// Model identifier sent to the provider.
    fn model(&self) -> &str;

    /// Run one completion and return the model's text.
    async fn complete(&self, prompt: &Prompt) -> Result<String, BackendError>;
}

/// Worker that renders a prompt, calls a `Completion` backend and extracts
/// the JSON analysis from its answer.
pub struct CompletionWorker<C> {
    backend: C,
}

impl<C: Completion> CompletionWorker<C> {
    /// Wrap a backend.
    pub fn new(backend: C) -> Self {
        Self { backend }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &C {
        &self.backend
    }
}

#[async_trait]
impl<C: Completion> Worker for CompletionWorker<C> {
    async fn process(&self, input: &Value, instructions: &str) -> WorkerReply {
        let provider = self.backend.provider();
        let prompt = Prompt::render(input, instructions)
            .map_err(|e| WorkerFailure::new(format!("Failed to render prompt: {e}")))?;

        debug!(
            provider = %provider,
            model = %self.backend.model(),
            prompt_len = prompt.len(),
            "Sending completion request"
        );

        let start = Instant::now();
        let text = match self.backend.complete(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(provider = %provider, model = %self.backend.model(), error = %e, "Completion failed");
                return Err(e.into());
            }
        };

        debug!(
            provider = %provider,
            response_len = text.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Completion received"
        );

        let reply = parse_analysis(&text);
        if reply.is_err() {
            warn!(provider = %provider, model = %self.backend.model(), "No JSON found in completion");
        }
        reply
    }
}
