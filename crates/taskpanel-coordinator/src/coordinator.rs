//! Two-round fan-out/gather execution.
//!
//! Round 1 hands the input to every task-worker at once and waits for all of
//! them to settle. If review instructions were given and at least one
//! reviewer is registered, round 2 hands every reviewer a `ReviewPayload`
//! built from the complete round-1 outcome list. Outcomes are always
//! collected in registry order, whatever order the workers finish in.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::task::{self, JoinError, JoinSet};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use taskpanel_core::{
    CombinedResult, ExecutionId, PanelError, ReviewPayload, TaskSpec, WorkerFailure,
    WorkerOutcome, WorkerReply,
};

use crate::config::CoordinatorConfig;
use crate::registry::{RegisteredWorker, Registry};

/// Which round a fan-out belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Round {
    Task,
    Review,
}

impl Round {
    pub fn as_str(&self) -> &'static str {
        match self {
            Round::Task => "task",
            Round::Review => "review",
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runs executions against a registry snapshot.
///
/// Holds no state between calls beyond its configuration.
#[derive(Debug, Clone, Default)]
pub struct Coordinator {
    config: CoordinatorConfig,
}

impl Coordinator {
    /// Create a new Coordinator.
    pub fn new(config: CoordinatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Execute one task against `registry`.
    ///
    /// Worker failures (including panics and timeouts) are recorded in the
    /// outcomes; the only call-level error is a review payload that cannot
    /// be serialized.
    pub async fn execute(
        &self,
        registry: &Registry,
        spec: TaskSpec,
    ) -> Result<CombinedResult, PanelError> {
        let execution_id = ExecutionId::generate();
        let started_at = Utc::now();

        let missing = spec.records_missing_id();
        if !missing.is_empty() {
            warn!(
                execution_id = %execution_id,
                positions = ?missing,
                "Input records without an id field; reviewers cannot cross-reference them"
            );
        }

        let task_workers = registry.task_workers();
        let reviewers = registry.reviewers();

        info!(
            execution_id = %execution_id,
            records = spec.input.len(),
            task_workers = task_workers.len(),
            reviewers = reviewers.len(),
            "Starting execution"
        );

        let task_outcomes = self
            .run_round(
                Round::Task,
                &task_workers,
                Arc::new(spec.input_value()),
                Arc::from(spec.task_instructions.as_str()),
            )
            .await;

        let review_outcomes = if !spec.wants_review() {
            debug!(execution_id = %execution_id, "No review instructions, skipping review round");
            Vec::new()
        } else if reviewers.is_empty() {
            debug!(execution_id = %execution_id, "No reviewers registered, skipping review round");
            Vec::new()
        } else {
            let payload = ReviewPayload::new(&spec, &task_outcomes).to_value()?;
            self.run_round(
                Round::Review,
                &reviewers,
                Arc::new(payload),
                Arc::from(spec.review_instructions.as_str()),
            )
            .await
        };

        let result = CombinedResult::new(
            execution_id,
            spec,
            task_outcomes,
            review_outcomes,
            started_at,
        );

        info!(
            execution_id = %result.execution_id,
            succeeded = result.succeeded(),
            failed = result.failed(),
            "Execution finished"
        );

        Ok(result)
    }

    /// Invoke every worker concurrently and wait for all of them.
    async fn run_round(
        &self,
        round: Round,
        workers: &[RegisteredWorker],
        input: Arc<Value>,
        instructions: Arc<str>,
    ) -> Vec<WorkerOutcome> {
        info!(round = %round, workers = workers.len(), "Round started");

        let round_start = Instant::now();
        let timeout = self.config.round_timeout;
        let deadline = timeout.map(|t| round_start + t);

        // One task per worker so a panic unwinds only that task. Dropping
        // the set aborts every worker still running.
        let mut tasks = JoinSet::new();
        let mut positions: HashMap<task::Id, usize> = HashMap::with_capacity(workers.len());

        for (idx, entry) in workers.iter().enumerate() {
            let worker = Arc::clone(&entry.worker);
            let input = Arc::clone(&input);
            let instructions = Arc::clone(&instructions);

            let handle = tasks.spawn(async move {
                let start = Instant::now();
                let call = worker.process(&input, &instructions);

                let reply: WorkerReply = match deadline {
                    Some(deadline) => match tokio::time::timeout_at(deadline, call).await {
                        Ok(reply) => reply,
                        Err(_) => Err(WorkerFailure::new(format!(
                            "timed out after {} ms",
                            timeout.map(|t| t.as_millis()).unwrap_or_default()
                        ))),
                    },
                    None => call.await,
                };

                (idx, reply, elapsed_ms(start))
            });
            positions.insert(handle.id(), idx);
        }

        let mut settled: Vec<Option<WorkerOutcome>> = vec![None; workers.len()];

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((idx, reply, ms)) => {
                    let descriptor = workers[idx].descriptor.clone();
                    settled[idx] = Some(WorkerOutcome::from_reply(descriptor, reply, ms));
                }
                Err(join_err) => {
                    let Some(&idx) = positions.get(&join_err.id()) else {
                        continue;
                    };
                    let descriptor = workers[idx].descriptor.clone();
                    let failure = contract_violation(join_err);
                    error!(
                        round = %round,
                        worker = %descriptor.name,
                        error = %failure,
                        "Worker violated its contract"
                    );
                    settled[idx] = Some(WorkerOutcome::failure(
                        descriptor,
                        failure,
                        elapsed_ms(round_start),
                    ));
                }
            }
        }

        let outcomes: Vec<WorkerOutcome> = workers
            .iter()
            .zip(settled)
            .map(|(entry, slot)| {
                slot.unwrap_or_else(|| {
                    WorkerOutcome::failure(
                        entry.descriptor.clone(),
                        WorkerFailure::new("worker task was cancelled"),
                        elapsed_ms(round_start),
                    )
                })
            })
            .collect();

        for outcome in outcomes.iter().filter(|o| !o.is_success()) {
            warn!(
                round = %round,
                worker = %outcome.worker.name,
                provider = %outcome.worker.provider,
                error = outcome.error.as_deref().unwrap_or_default(),
                elapsed_ms = outcome.elapsed_ms,
                "Worker failed"
            );
        }

        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
        info!(
            round = %round,
            succeeded,
            failed = outcomes.len() - succeeded,
            elapsed_ms = elapsed_ms(round_start),
            "Round settled"
        );

        outcomes
    }
}

fn elapsed_ms(since: Instant) -> u64 {
    u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Describe a worker task that ended without returning a reply.
fn contract_violation(err: JoinError) -> WorkerFailure {
    if err.is_panic() {
        let detail = panic_message(err.into_panic());
        WorkerFailure::new(format!("worker panicked: {detail}"))
    } else {
        WorkerFailure::new("worker task was cancelled")
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
