//! Error types for worker backends.

use taskpanel_core::WorkerFailure;
use thiserror::Error;

/// Errors that can occur while talking to a backend.
///
/// These never leave a worker: `CompletionWorker` turns each one into a
/// `WorkerFailure` for the outcome.
#[derive(Debug, Error)]
pub enum BackendError {
    /// No API key configured or found in the environment.
    #[error("API key not set (expected environment variable {0})")]
    MissingApiKey(String),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// Provider answered but the response carried no text.
    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: &'static str, body: String },

    /// Provider answered with a success status but a body that is not JSON.
    #[error("{provider} returned an unreadable response: {message}")]
    InvalidResponse {
        provider: &'static str,
        message: String,
        body: String,
    },

    /// Failed to spawn a local backend process.
    #[error("Failed to spawn process: {0}")]
    Spawn(#[from] std::io::Error),

    /// Local backend process exited with an error.
    #[error("Process exited with error: {message}")]
    Process {
        message: String,
        output: Option<String>,
    },

    /// Backend did not answer within the configured request timeout.
    #[error("Timed out after {0} s waiting for backend")]
    Timeout(u64),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<BackendError> for WorkerFailure {
    fn from(err: BackendError) -> Self {
        let message = err.to_string();
        match err {
            BackendError::Process {
                output: Some(output),
                ..
            } => WorkerFailure::new(message).with_raw_output(output),
            BackendError::EmptyResponse { body, .. } | BackendError::InvalidResponse { body, .. }
                if !body.trim().is_empty() =>
            {
                WorkerFailure::new(message).with_raw_output(body)
            }
            _ => WorkerFailure::new(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message() {
        let err = BackendError::Api {
            provider: "anthropic",
            status: 429,
            message: "rate limited".to_string(),
        };
        let failure: WorkerFailure = err.into();
        assert_eq!(failure.message, "anthropic API error (429): rate limited");
        assert!(failure.raw_output.is_none());
    }

    #[test]
    fn test_process_error_keeps_output() {
        let err = BackendError::Process {
            message: "exit code 1".to_string(),
            output: Some("partial text".to_string()),
        };
        let failure: WorkerFailure = err.into();
        assert_eq!(failure.raw_output.as_deref(), Some("partial text"));
    }

    #[test]
    fn test_unreadable_response_keeps_body() {
        let err = BackendError::InvalidResponse {
            provider: "openai",
            message: "expected value at line 1 column 1".to_string(),
            body: "<html>Bad Gateway</html>".to_string(),
        };
        let failure: WorkerFailure = err.into();
        assert!(failure.message.starts_with("openai returned an unreadable response"));
        assert_eq!(failure.raw_output.as_deref(), Some("<html>Bad Gateway</html>"));
    }

    #[test]
    fn test_empty_response_keeps_envelope() {
        let err = BackendError::EmptyResponse {
            provider: "anthropic",
            body: r#"{"content":[]}"#.to_string(),
        };
        let failure: WorkerFailure = err.into();
        assert_eq!(failure.message, "anthropic returned an empty response");
        assert_eq!(failure.raw_output.as_deref(), Some(r#"{"content":[]}"#));

        let blank: WorkerFailure = BackendError::EmptyResponse {
            provider: "claude-code",
            body: "  \n".to_string(),
        }
        .into();
        assert!(blank.raw_output.is_none());
    }
}
