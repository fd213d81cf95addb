//! Prompt rendering shared by the LLM backends.

use serde_json::Value;

/// Directive appended to every system prompt.
const RESPONSE_FORMAT: &str = "Respond with a single JSON object and nothing else. \
Whenever you refer to an input record, use the value of its \"id\" field.";

/// A rendered prompt: system instructions plus the user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Render instructions and input into a prompt.
    pub fn render(input: &Value, instructions: &str) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string_pretty(input)?;

        let system = format!("{}\n\n{}", instructions.trim(), RESPONSE_FORMAT);
        let user = format!("Input:\n```json\n{}\n```", body);

        Ok(Self { system, user })
    }

    /// Total prompt length in bytes, for logging.
    pub fn len(&self) -> usize {
        self.system.len() + self.user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
