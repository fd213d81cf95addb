//! Role and status enums for workers and their outcomes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which round a registered worker takes part in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerRole {
    /// Runs the primary task in round 1.
    #[default]
    Task,
    /// Critiques round-1 outcomes in round 2.
    Reviewer,
}

impl WorkerRole {
    /// Returns true for reviewer-workers.
    pub fn is_reviewer(&self) -> bool {
        matches!(self, Self::Reviewer)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Task => "task",
            Self::Reviewer => "reviewer",
        }
    }
}

impl fmt::Display for WorkerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a single worker invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Worker produced a structured analysis.
    Success,
    /// Worker failed; see the outcome's error description.
    Error,
}

impl OutcomeStatus {
    /// Returns true if the invocation succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&WorkerRole::Reviewer).unwrap();
        assert_eq!(json, "\"reviewer\"");
        let role: WorkerRole = serde_json::from_str("\"task\"").unwrap();
        assert_eq!(role, WorkerRole::Task);
    }

    #[test]
    fn test_default_role_is_task() {
        assert_eq!(WorkerRole::default(), WorkerRole::Task);
        assert!(!WorkerRole::Task.is_reviewer());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&OutcomeStatus::Error).unwrap(),
            "\"error\""
        );
        assert!(OutcomeStatus::Success.is_success());
    }
}
