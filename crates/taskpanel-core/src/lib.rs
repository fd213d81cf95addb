//! TaskPanel Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Subprocesses
//! - Runtime specifics
//!
//! All types here represent the core business domain of TaskPanel: worker
//! identities, task specifications, per-worker outcomes and the combined
//! result of a two-round execution.

pub mod catalog;
pub mod descriptor;
pub mod error;
pub mod ids;
pub mod outcome;
pub mod status;
pub mod task;
pub mod worker;

// Re-export commonly used types
pub use catalog::{Preset, TaskCatalog};
pub use descriptor::{ProviderKind, WorkerDescriptor};
pub use error::PanelError;
pub use ids::ExecutionId;
pub use outcome::{CombinedResult, WorkerOutcome};
pub use status::{OutcomeStatus, WorkerRole};
pub use task::{ReviewPayload, TaskSpec};
pub use worker::{Worker, WorkerFailure, WorkerReply};
