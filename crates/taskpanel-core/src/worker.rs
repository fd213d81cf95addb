//! The worker capability contract.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Why a worker could not produce a usable analysis.
///
/// This is data, not a call-level error: the coordinator stores it in the
/// worker's outcome and carries on with the round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct WorkerFailure {
    /// Human-readable description.
    pub message: String,

    /// Raw backend text, when the backend answered with something unusable.
    pub raw_output: Option<String>,
}

impl WorkerFailure {
    /// Create a failure with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raw_output: None,
        }
    }

    /// Builder method to attach the raw backend text.
    pub fn with_raw_output(mut self, raw: impl Into<String>) -> Self {
        self.raw_output = Some(raw.into());
        self
    }
}

/// What a worker hands back: a structured analysis or a failure.
pub type WorkerReply = Result<Value, WorkerFailure>;

/// A capability that turns (input, instructions) into an analysis.
///
/// Implementations must not panic: every fault in contacting a backend,
/// parsing its response or validating its output is reported as a
/// `WorkerFailure`. The coordinator still guards against panics, but treats
/// them as defects.
#[async_trait]
pub trait Worker: Send + Sync {
    /// Run the worker once.
    ///
    /// `input` is whatever payload the caller supplies; for task-workers it
    /// is the array of input records, for reviewers it is the serialized
    /// review payload.
    async fn process(&self, input: &Value, instructions: &str) -> WorkerReply;
}
