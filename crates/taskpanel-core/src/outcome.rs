//! Per-worker outcomes and the combined execution result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ExecutionId, OutcomeStatus, TaskSpec, WorkerDescriptor, WorkerFailure, WorkerReply};

/// Result of one worker invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerOutcome {
    /// Identity of the worker that produced this outcome.
    pub worker: WorkerDescriptor,

    /// Whether the invocation succeeded.
    pub status: OutcomeStatus,

    /// Structured analysis on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Value>,

    /// Error description on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Unparsed backend text, when the backend answered but extraction failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_output: Option<String>,

    /// Wall-clock duration of the invocation in milliseconds.
    pub elapsed_ms: u64,
}

impl WorkerOutcome {
    /// Create a successful outcome.
    pub fn success(worker: WorkerDescriptor, analysis: Value, elapsed_ms: u64) -> Self {
        Self {
            worker,
            status: OutcomeStatus::Success,
            analysis: Some(analysis),
            error: None,
            raw_output: None,
            elapsed_ms,
        }
    }

    /// Create a failed outcome.
    pub fn failure(worker: WorkerDescriptor, failure: WorkerFailure, elapsed_ms: u64) -> Self {
        Self {
            worker,
            status: OutcomeStatus::Error,
            analysis: None,
            error: Some(failure.message),
            raw_output: failure.raw_output,
            elapsed_ms,
        }
    }

    /// Create an outcome from whatever the worker replied.
    pub fn from_reply(worker: WorkerDescriptor, reply: WorkerReply, elapsed_ms: u64) -> Self {
        match reply {
            Ok(analysis) => Self::success(worker, analysis, elapsed_ms),
            Err(failure) => Self::failure(worker, failure, elapsed_ms),
        }
    }

    /// Returns true if the invocation succeeded.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Final output of one execution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedResult {
    /// Unique execution identifier.
    pub execution_id: ExecutionId,

    /// Preset name, if the task came from the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Snapshot of the input records.
    pub input: Vec<Value>,

    /// Instructions given to the task-workers.
    pub task_instructions: String,

    /// Instructions given to the reviewer-workers.
    pub review_instructions: String,

    /// Round-1 outcomes, one per task-worker, in registry order.
    pub task_outcomes: Vec<WorkerOutcome>,

    /// Round-2 outcomes, one per reviewer-worker, in registry order.
    /// Empty when the review round was skipped.
    pub review_outcomes: Vec<WorkerOutcome>,

    /// When the execution started.
    pub started_at: DateTime<Utc>,

    /// When the execution finished.
    pub finished_at: DateTime<Utc>,
}

impl CombinedResult {
    /// Merge a spec and both rounds into a result.
    pub fn new(
        execution_id: ExecutionId,
        spec: TaskSpec,
        task_outcomes: Vec<WorkerOutcome>,
        review_outcomes: Vec<WorkerOutcome>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            execution_id,
            preset: None,
            input: spec.input,
            task_instructions: spec.task_instructions,
            review_instructions: spec.review_instructions,
            task_outcomes,
            review_outcomes,
            started_at,
            finished_at: Utc::now(),
        }
    }

    /// Builder method to record the preset name.
    pub fn with_preset(mut self, name: impl Into<String>) -> Self {
        self.preset = Some(name.into());
        self
    }

    /// Number of successful outcomes across both rounds.
    pub fn succeeded(&self) -> usize {
        self.all_outcomes().filter(|o| o.is_success()).count()
    }

    /// Number of failed outcomes across both rounds.
    pub fn failed(&self) -> usize {
        self.all_outcomes().filter(|o| !o.is_success()).count()
    }

    /// Returns true if every worker in both rounds succeeded.
    pub fn is_fully_successful(&self) -> bool {
        self.failed() == 0
    }

    /// Returns true if the review round ran.
    pub fn was_reviewed(&self) -> bool {
        !self.review_outcomes.is_empty()
    }

    /// Iterate both rounds in order.
    pub fn all_outcomes(&self) -> impl Iterator<Item = &WorkerOutcome> {
        self.task_outcomes.iter().chain(self.review_outcomes.iter())
    }
}
