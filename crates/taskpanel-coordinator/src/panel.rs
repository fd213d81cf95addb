//! The TaskPanel facade: owns the registry and delegates to the coordinator.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::info;

use taskpanel_core::{
    CombinedResult, PanelError, TaskCatalog, TaskSpec, Worker, WorkerDescriptor, WorkerRole,
};
use taskpanel_workers::{BackendConfig, WorkerFactory};

use crate::catalog::PresetCatalog;
use crate::config::CoordinatorConfig;
use crate::coordinator::Coordinator;
use crate::registry::Registry;

/// Entry point for registering workers and running tasks.
///
/// The registry lives behind an async `RwLock`. Each execution clones the
/// worker list under a short read lock and runs against that snapshot, so
/// add/remove calls made mid-execution only affect later executions.
pub struct TaskPanel {
    registry: RwLock<Registry>,
    factory: WorkerFactory,
    catalog: Arc<dyn TaskCatalog>,
    coordinator: Coordinator,
}

impl TaskPanel {
    /// Create a panel with the built-in backends and presets.
    pub fn new() -> Self {
        Self {
            registry: RwLock::new(Registry::new()),
            factory: WorkerFactory::with_builtin_backends(),
            catalog: Arc::new(PresetCatalog::builtin()),
            coordinator: Coordinator::default(),
        }
    }

    /// Builder method to replace the worker factory.
    pub fn with_factory(mut self, factory: WorkerFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Builder method to replace the task catalog.
    pub fn with_catalog(mut self, catalog: Arc<dyn TaskCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Builder method to set coordinator configuration.
    pub fn with_config(mut self, config: CoordinatorConfig) -> Self {
        self.coordinator = Coordinator::new(config);
        self
    }

    pub fn catalog(&self) -> &dyn TaskCatalog {
        self.catalog.as_ref()
    }

    pub fn factory(&self) -> &WorkerFactory {
        &self.factory
    }

    /// Build a worker through the factory and register it.
    ///
    /// Fails with `UnknownProviderKind` (leaving the registry unchanged) if
    /// `provider_kind` names no registered backend.
    pub async fn add_worker(
        &self,
        name: &str,
        provider_kind: &str,
        model: &str,
        role: WorkerRole,
        config: &BackendConfig,
    ) -> Result<WorkerDescriptor, PanelError> {
        let (kind, worker) = self.factory.build_from_str(provider_kind, model, config)?;
        let descriptor = WorkerDescriptor::new(name, kind.as_str(), model).with_role(role);

        self.add_worker_instance(descriptor.clone(), worker).await;
        Ok(descriptor)
    }

    /// Register an already-constructed worker.
    pub async fn add_worker_instance(&self, descriptor: WorkerDescriptor, worker: Arc<dyn Worker>) {
        info!(worker = %descriptor, "Registering worker");
        self.registry.write().await.add(descriptor, worker);
    }

    /// Remove the first worker named `name` in `role`. Returns false if none matched.
    pub async fn remove_worker(&self, name: &str, role: WorkerRole) -> bool {
        let removed = self.registry.write().await.remove(name, role);
        if removed {
            info!(worker = %name, role = %role, "Removed worker");
        }
        removed
    }

    /// Ordered snapshot of registered workers.
    pub async fn list_workers(&self) -> Vec<WorkerDescriptor> {
        self.registry.read().await.descriptors()
    }

    /// Run a custom task.
    ///
    /// `input` must be a JSON array of records; anything else is rejected
    /// with `StructuralInput` before any worker runs.
    pub async fn execute_task(
        &self,
        input: Value,
        task_instructions: &str,
        review_instructions: &str,
    ) -> Result<CombinedResult, PanelError> {
        let spec = TaskSpec::new(input, task_instructions, review_instructions)?;
        self.execute_spec(spec).await
    }

    /// Run a named preset task.
    ///
    /// Fails with `PresetNotFound` without invoking any worker if the
    /// catalog has no such preset.
    pub async fn execute_preset_task(
        &self,
        preset_name: &str,
        input: Value,
    ) -> Result<CombinedResult, PanelError> {
        let preset = self.catalog.resolve(preset_name)?;
        info!(preset = %preset.name, "Running preset task");

        let spec = TaskSpec::new(input, preset.instructions, preset.review_instructions)?;
        let result = self.execute_spec(spec).await?;
        Ok(result.with_preset(preset.name))
    }

    async fn execute_spec(&self, spec: TaskSpec) -> Result<CombinedResult, PanelError> {
        let snapshot = self.registry.read().await.clone();
        self.coordinator.execute(&snapshot, spec).await
    }
}

impl Default for TaskPanel {
    fn default() -> Self {
        Self::new()
    }
}
