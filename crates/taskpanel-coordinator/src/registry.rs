//! Ordered worker registry.

use std::fmt;
use std::sync::Arc;

use taskpanel_core::{Worker, WorkerDescriptor, WorkerRole};

/// A worker together with the identity it was registered under.
#[derive(Clone)]
pub struct RegisteredWorker {
    pub descriptor: WorkerDescriptor,
    pub worker: Arc<dyn Worker>,
}

impl fmt::Debug for RegisteredWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredWorker")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of workers, partitioned by role.
///
/// Cloning is cheap (one `Arc` clone per entry) and is how the facade takes
/// a snapshot before each execution.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RegisteredWorker>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a worker. Duplicate names are kept as separate entries.
    pub fn add(&mut self, descriptor: WorkerDescriptor, worker: Arc<dyn Worker>) {
        self.entries.push(RegisteredWorker { descriptor, worker });
    }

    /// Remove the first entry named `name` within `role`.
    ///
    /// Returns false (and changes nothing) if there is no such entry.
    pub fn remove(&mut self, name: &str, role: WorkerRole) -> bool {
        let position = self
            .entries
            .iter()
            .position(|e| e.descriptor.role == role && e.descriptor.name == name);

        match position {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Snapshot of every descriptor, in registration order.
    pub fn descriptors(&self) -> Vec<WorkerDescriptor> {
        self.entries.iter().map(|e| e.descriptor.clone()).collect()
    }

    /// Task-workers in registration order.
    pub fn task_workers(&self) -> Vec<RegisteredWorker> {
        self.with_role(WorkerRole::Task)
    }

    /// Reviewer-workers in registration order.
    pub fn reviewers(&self) -> Vec<RegisteredWorker> {
        self.with_role(WorkerRole::Reviewer)
    }

    fn with_role(&self, role: WorkerRole) -> Vec<RegisteredWorker> {
        self.entries
            .iter()
            .filter(|e| e.descriptor.role == role)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedWorker;

    fn desc(name: &str, model: &str) -> WorkerDescriptor {
        WorkerDescriptor::new(name, "echo", model)
    }

    #[test]
    fn test_partitions_by_role_in_order() {
        let mut registry = Registry::new();
        registry.add(desc("a", "m"), ScriptedWorker::ok_empty());
        registry.add(desc("r", "m").reviewer(), ScriptedWorker::ok_empty());
        registry.add(desc("b", "m"), ScriptedWorker::ok_empty());

        let tasks: Vec<_> = registry.task_workers().into_iter().map(|e| e.descriptor.name).collect();
        let reviewers: Vec<_> = registry.reviewers().into_iter().map(|e| e.descriptor.name).collect();

        assert_eq!(tasks, vec!["a", "b"]);
        assert_eq!(reviewers, vec!["r"]);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_remove_first_match_in_role() {
        let mut registry = Registry::new();
        registry.add(desc("dup", "first"), ScriptedWorker::ok_empty());
        registry.add(desc("dup", "second"), ScriptedWorker::ok_empty());
        registry.add(desc("dup", "reviewer").reviewer(), ScriptedWorker::ok_empty());

        assert!(registry.remove("dup", WorkerRole::Task));

        let remaining: Vec<_> = registry.descriptors().into_iter().map(|d| d.model).collect();
        assert_eq!(remaining, vec!["second", "reviewer"]);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut registry = Registry::new();
        registry.add(desc("a", "m"), ScriptedWorker::ok_empty());

        assert!(!registry.remove("missing", WorkerRole::Task));
        assert!(!registry.remove("a", WorkerRole::Reviewer));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut registry = Registry::new();
        registry.add(desc("a", "m"), ScriptedWorker::ok_empty());
        let snapshot = registry.clone();

        registry.remove("a", WorkerRole::Task);
        assert!(registry.is_empty());
        assert_eq!(snapshot.len(), 1);
    }
}
