//! Construct workers from a provider kind.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use taskpanel_core::{PanelError, ProviderKind, Worker};
use tracing::debug;

use crate::anthropic::AnthropicBackend;
use crate::claude_code::ClaudeCodeBackend;
use crate::completion::CompletionWorker;
use crate::config::BackendConfig;
use crate::echo::EchoWorker;
use crate::error::BackendError;
use crate::gemini::GeminiBackend;
use crate::openai::OpenAiBackend;

/// Builds a worker for a model with the given backend settings.
pub type WorkerConstructor =
    Arc<dyn Fn(&str, &BackendConfig) -> Result<Arc<dyn Worker>, BackendError> + Send + Sync>;

/// Maps provider kinds to worker constructors.
#[derive(Clone)]
pub struct WorkerFactory {
    constructors: HashMap<ProviderKind, WorkerConstructor>,
}

impl WorkerFactory {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Create a factory with every built-in backend registered.
    pub fn with_builtin_backends() -> Self {
        let mut factory = Self::new();

        factory.register(ProviderKind::Anthropic, |model, config| {
            let backend = AnthropicBackend::new(model, config.clone())?;
            Ok(Arc::new(CompletionWorker::new(backend)) as Arc<dyn Worker>)
        });

        for kind in [
            ProviderKind::OpenAi,
            ProviderKind::OpenRouter,
            ProviderKind::Ollama,
        ] {
            factory.register(kind, move |model, config| {
                let backend = OpenAiBackend::new(kind, model, config.clone())?;
                Ok(Arc::new(CompletionWorker::new(backend)) as Arc<dyn Worker>)
            });
        }

        factory.register(ProviderKind::Gemini, |model, config| {
            let backend = GeminiBackend::new(model, config.clone())?;
            Ok(Arc::new(CompletionWorker::new(backend)) as Arc<dyn Worker>)
        });

        factory.register(ProviderKind::ClaudeCode, |model, config| {
            let backend = ClaudeCodeBackend::new(model, config.clone());
            Ok(Arc::new(CompletionWorker::new(backend)) as Arc<dyn Worker>)
        });

        factory.register(ProviderKind::Echo, |model, _config| {
            Ok(Arc::new(EchoWorker::new(model)) as Arc<dyn Worker>)
        });

        factory
    }

    /// Register (or replace) the constructor for a provider kind.
    pub fn register<F>(&mut self, kind: ProviderKind, constructor: F)
    where
        F: Fn(&str, &BackendConfig) -> Result<Arc<dyn Worker>, BackendError>
            + Send
            + Sync
            + 'static,
    {
        self.constructors.insert(kind, Arc::new(constructor));
    }

    /// Returns true if a constructor is registered for `kind`.
    pub fn supports(&self, kind: ProviderKind) -> bool {
        self.constructors.contains_key(&kind)
    }

    /// Registered provider kinds, in canonical order.
    pub fn kinds(&self) -> Vec<ProviderKind> {
        ProviderKind::all()
            .into_iter()
            .filter(|kind| self.supports(*kind))
            .collect()
    }

    /// Build a worker for `kind`.
    pub fn build(
        &self,
        kind: ProviderKind,
        model: &str,
        config: &BackendConfig,
    ) -> Result<Arc<dyn Worker>, PanelError> {
        let constructor = self
            .constructors
            .get(&kind)
            .ok_or_else(|| PanelError::UnknownProviderKind(kind.to_string()))?;

        debug!(provider = %kind, model = %model, "Constructing worker");
        constructor(model, config).map_err(|e| PanelError::WorkerConstruction(e.to_string()))
    }

    /// Build a worker from a provider kind string (e.g. "openai").
    pub fn build_from_str(
        &self,
        kind: &str,
        model: &str,
        config: &BackendConfig,
    ) -> Result<(ProviderKind, Arc<dyn Worker>), PanelError> {
        let kind: ProviderKind = kind.parse()?;
        let worker = self.build(kind, model, config)?;
        Ok((kind, worker))
    }
}

impl Default for WorkerFactory {
    fn default() -> Self {
        Self::with_builtin_backends()
    }
}

impl fmt::Debug for WorkerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerFactory")
            .field("kinds", &self.kinds())
            .finish()
    }
}
