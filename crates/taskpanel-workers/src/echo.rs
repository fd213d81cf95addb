//! Offline worker that answers deterministically without any backend.
//!
//! Useful for dry runs of a roster and for exercising the two-round flow
//! end to end. Task input yields one finding per record; a review payload
//! yields one finding per round-1 outcome.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use taskpanel_core::{Worker, WorkerFailure, WorkerReply};

/// Deterministic stand-in for an LLM worker.
#[derive(Debug, Clone, Default)]
pub struct EchoWorker {
    label: String,
}

impl EchoWorker {
    /// Create an echo worker; `label` shows up in every analysis.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    fn analyze_records(&self, records: &[Value], instructions: &str) -> Value {
        let findings: Vec<Value> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let id = record.get("id").cloned().unwrap_or_else(|| json!(idx));
                let fields = record.as_object().map(Map::len).unwrap_or(0);
                json!({ "id": id, "fields": fields })
            })
            .collect();

        json!({
            "echo": self.label,
            "instructions": instructions.trim(),
            "record_count": records.len(),
            "findings": findings,
        })
    }

    fn review_outcomes(&self, outcomes: &[Value], instructions: &str) -> Value {
        let findings: Vec<Value> = outcomes
            .iter()
            .map(|outcome| {
                json!({
                    "worker": outcome.pointer("/worker/name").cloned().unwrap_or(Value::Null),
                    "status": outcome.get("status").cloned().unwrap_or(Value::Null),
                })
            })
            .collect();

        json!({
            "echo": self.label,
            "instructions": instructions.trim(),
            "reviewed": outcomes.len(),
            "findings": findings,
        })
    }
}

#[async_trait]
impl Worker for EchoWorker {
    async fn process(&self, input: &Value, instructions: &str) -> WorkerReply {
        match input {
            Value::Array(records) => Ok(self.analyze_records(records, instructions)),
            Value::Object(payload) => match payload.get("outcomes") {
                Some(Value::Array(outcomes)) => Ok(self.review_outcomes(outcomes, instructions)),
                _ => Err(WorkerFailure::new("echo worker expected a review payload with outcomes")),
            },
            _ => Err(WorkerFailure::new("echo worker expected an array or a review payload")),
        }
    }
}
