//! Result sinks.

use std::io::Write;
use std::path::{Path, PathBuf};

use taskpanel_core::CombinedResult;
use tracing::info;

use crate::error::SinkError;

/// Accepts a finished result and serializes it somewhere.
pub trait ResultSink {
    fn write(&self, result: &CombinedResult) -> Result<(), SinkError>;
}

/// Writes pretty-printed JSON to a file, creating parent directories.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ResultSink for JsonFileSink {
    fn write(&self, result: &CombinedResult) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut body = serde_json::to_string_pretty(result)?;
        body.push('\n');
        std::fs::write(&self.path, body)?;

        info!(
            execution_id = %result.execution_id,
            path = %self.path.display(),
            "Result written"
        );
        Ok(())
    }
}

/// Prints pretty-printed JSON to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl ResultSink for StdoutSink {
    fn write(&self, result: &CombinedResult) -> Result<(), SinkError> {
        let body = serde_json::to_string_pretty(result)?;
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{body}")?;
        stdout.flush()?;
        Ok(())
    }
}
