//! Preset task lookup.

use serde::{Deserialize, Serialize};

use crate::PanelError;

/// A named, pre-authored pair of task and review instructions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    /// Preset name.
    pub name: String,

    /// Instructions for the task-workers.
    pub instructions: String,

    /// Instructions for the reviewers. Empty means no review round.
    #[serde(default)]
    pub review_instructions: String,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        review_instructions: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            review_instructions: review_instructions.into(),
        }
    }
}

/// Read-only lookup from preset name to instructions.
pub trait TaskCatalog: Send + Sync {
    /// Resolve a preset by name.
    ///
    /// Fails with `PanelError::PresetNotFound` when the name is unknown.
    fn resolve(&self, name: &str) -> Result<Preset, PanelError>;

    /// Names of all presets, sorted.
    fn names(&self) -> Vec<String>;
}
