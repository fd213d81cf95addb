//! TaskPanel Coordinator
//!
//! This crate owns the worker registry and the two-round execution engine:
//! fan a task out to every task-worker, gather their outcomes in registry
//! order, hand the complete outcome list to every reviewer, and merge both
//! rounds into a `CombinedResult`. It also provides the built-in preset
//! catalog and result sinks.

pub mod catalog;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod panel;
pub mod registry;
pub mod sink;

#[cfg(test)]
mod testing;

pub use catalog::PresetCatalog;
pub use config::CoordinatorConfig;
pub use coordinator::{Coordinator, Round};
pub use error::{CatalogError, SinkError};
pub use panel::TaskPanel;
pub use registry::{RegisteredWorker, Registry};
pub use sink::{JsonFileSink, ResultSink, StdoutSink};
