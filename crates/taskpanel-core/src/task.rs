//! Task specification and review payload types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{PanelError, WorkerOutcome};

/// Field each input record is expected to carry for cross-referencing.
pub const RECORD_ID_FIELD: &str = "id";

/// One execution request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Ordered input records.
    pub input: Vec<Value>,

    /// Instructions for the task-workers.
    pub task_instructions: String,

    /// Instructions for the reviewer-workers. Empty means no review round.
    pub review_instructions: String,
}

impl TaskSpec {
    /// Build a TaskSpec from an arbitrary JSON payload.
    ///
    /// The payload must be an array; anything else is rejected before any
    /// worker runs.
    pub fn new(
        input: Value,
        task_instructions: impl Into<String>,
        review_instructions: impl Into<String>,
    ) -> Result<Self, PanelError> {
        match input {
            Value::Array(records) => Ok(Self::from_records(
                records,
                task_instructions,
                review_instructions,
            )),
            other => Err(PanelError::StructuralInput(format!(
                "expected an array of records, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Build a TaskSpec from already-split records.
    pub fn from_records(
        records: Vec<Value>,
        task_instructions: impl Into<String>,
        review_instructions: impl Into<String>,
    ) -> Self {
        Self {
            input: records,
            task_instructions: task_instructions.into(),
            review_instructions: review_instructions.into(),
        }
    }

    /// Returns true if review instructions were supplied.
    ///
    /// Whitespace-only instructions count as absent, so they skip the review
    /// round just like an empty string.
    pub fn wants_review(&self) -> bool {
        !self.review_instructions.trim().is_empty()
    }

    /// Input records as one JSON array value.
    pub fn input_value(&self) -> Value {
        Value::Array(self.input.clone())
    }

    /// Positions of records that carry no identifier field.
    pub fn records_missing_id(&self) -> Vec<usize> {
        self.input
            .iter()
            .enumerate()
            .filter(|(_, record)| record.get(RECORD_ID_FIELD).is_none())
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Input to the review round.
///
/// Pairs the original input with every round-1 outcome, failures included,
/// so reviewers can comment on what went wrong.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewPayload {
    /// Original task input.
    pub input: Vec<Value>,

    /// Instructions the task-workers were given.
    pub task_instructions: String,

    /// Instructions for the reviewers.
    pub review_instructions: String,

    /// Round-1 outcomes in registry order.
    pub outcomes: Vec<WorkerOutcome>,
}

impl ReviewPayload {
    /// Assemble the payload from a spec and its round-1 outcomes.
    pub fn new(spec: &TaskSpec, outcomes: &[WorkerOutcome]) -> Self {
        Self {
            input: spec.input.clone(),
            task_instructions: spec.task_instructions.clone(),
            review_instructions: spec.review_instructions.clone(),
            outcomes: outcomes.to_vec(),
        }
    }

    /// Serialize into the value handed to reviewer-workers.
    pub fn to_value(&self) -> Result<Value, PanelError> {
        Ok(serde_json::to_value(self)?)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
