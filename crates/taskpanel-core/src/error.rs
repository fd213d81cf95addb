//! Call-level errors.

use thiserror::Error;

/// Errors that reject a whole call.
///
/// Individual worker failures never show up here; they are recorded as
/// `status=error` outcomes inside the result.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Requested preset name is not in the catalog.
    #[error("Preset not found: {0}")]
    PresetNotFound(String),

    /// No worker implementation is registered for the provider kind.
    #[error("Unknown provider kind: {0}")]
    UnknownProviderKind(String),

    /// A worker for a known provider kind could not be constructed.
    #[error("Failed to construct worker: {0}")]
    WorkerConstruction(String),

    /// Input payload is not an ordered sequence of records.
    #[error("Invalid input payload: {0}")]
    StructuralInput(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for PanelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e.to_string())
    }
}
