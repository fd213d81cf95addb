//! Worker backends for TaskPanel
//!
//! Every backend ends up behind the `taskpanel_core::Worker` trait. Remote
//! LLM providers and the Claude Code CLI implement `Completion` and are
//! wrapped in a `CompletionWorker`, which renders the prompt and extracts
//! the JSON analysis from the model's text. `EchoWorker` answers offline.
//!
//! # Example
//!
//! ```rust,no_run
//! use serde_json::json;
//! use taskpanel_core::ProviderKind;
//! use taskpanel_workers::{BackendConfig, WorkerFactory};
//!
//! async fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     let factory = WorkerFactory::default();
//!     let worker = factory.build(
//!         ProviderKind::OpenAi,
//!         "gpt-4o",
//!         &BackendConfig::default().with_temperature(0.2),
//!     )?;
//!
//!     let analysis = worker
//!         .process(&json!([{"id": "a1", "text": "hello"}]), "Classify the sentiment.")
//!         .await?;
//!     println!("{analysis}");
//!     Ok(())
//! }
//! ```

mod anthropic;
mod claude_code;
mod completion;
mod config;
mod echo;
mod error;
mod extract;
mod factory;
mod gemini;
mod http;
mod openai;
mod prompt;

// Re-export main types
pub use anthropic::AnthropicBackend;
pub use claude_code::{ClaudeCodeBackend, DEFAULT_CLAUDE_PATH};
pub use completion::{Completion, CompletionWorker};
pub use config::{BackendConfig, DEFAULT_MAX_TOKENS, DEFAULT_REQUEST_TIMEOUT_SECS};
pub use echo::EchoWorker;
pub use error::BackendError;
pub use extract::{extract_json, parse_analysis};
pub use factory::{WorkerConstructor, WorkerFactory};
pub use gemini::GeminiBackend;
pub use openai::OpenAiBackend;
pub use prompt::Prompt;
