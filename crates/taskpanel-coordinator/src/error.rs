//! Coordinator-side IO errors.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load a preset file.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read preset file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid preset file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Failure to write a result.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
