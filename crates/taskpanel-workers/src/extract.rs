//! Best-effort JSON extraction from free-form model output.
//!
//! Models wrap JSON in prose or markdown fences more often than not. The
//! extractor tries, in order:
//! 1. the whole trimmed text
//! 2. the first fenced code block (```json or bare ```)
//! 3. the first balanced `{...}` or `[...]` span that parses, skipping each
//!    balanced span that does not as a whole
//!
//! Only objects and arrays count as an analysis.

use serde_json::Value;
use taskpanel_core::{WorkerFailure, WorkerReply};

/// Extract the first JSON object or array from `text`.
pub fn extract_json(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(value) = parse_structured(trimmed) {
        return Some(value);
    }

    if let Some(value) = fenced_block(trimmed).and_then(parse_structured) {
        return Some(value);
    }

    balanced_span(trimmed)
}

/// Turn backend text into a worker reply, keeping the raw text on failure.
pub fn parse_analysis(text: &str) -> WorkerReply {
    extract_json(text).ok_or_else(|| {
        WorkerFailure::new("backend response contained no JSON object").with_raw_output(text)
    })
}

fn parse_structured(candidate: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(candidate.trim()) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => Some(value),
        _ => None,
    }
}

/// Contents of the first ``` fenced block, without the language tag.
fn fenced_block(text: &str) -> Option<&str> {
    let start = text.find("```")?;
    let after_fence = &text[start + 3..];
    // Skip the info string (e.g. "json") up to the end of the line
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    let end = body.find("```")?;
    Some(&body[..end])
}

/// First balanced `{...}`/`[...]` span that parses as JSON.
fn balanced_span(text: &str) -> Option<Value> {
    let bytes = text.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find(|c: char| c == '{' || c == '[') {
        let start = search_from + offset;
        search_from = match matching_close(bytes, start) {
            Some(end) => match parse_structured(&text[start..=end]) {
                Some(value) => return Some(value),
                // Nothing inside a balanced span that failed to parse is tried again
                None => end + 1,
            },
            None => start + 1,
        };
    }

    None
}

/// Index of the bracket closing the one at `start`, honouring string literals.
fn matching_close(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_json() {
        assert_eq!(extract_json(r#" {"a": 1} "#), Some(json!({"a": 1})));
        assert_eq!(extract_json("[1, 2]"), Some(json!([1, 2])));
    }

    #[test]
    fn test_fenced_block() {
        let text = "Here is my analysis:\n```json\n{\"verdict\": \"ok\"}\n```\nThanks!";
        assert_eq!(extract_json(text), Some(json!({"verdict": "ok"})));
    }

    #[test]
    fn test_bare_fence() {
        let text = "```\n{\"items\": []}\n```";
        assert_eq!(extract_json(text), Some(json!({"items": []})));
    }

    #[test]
    fn test_embedded_object_with_braces_in_strings() {
        let text = r#"Sure. {"summary": "uses {curly} and \"quotes\"", "n": 2} Hope that helps."#;
        assert_eq!(
            extract_json(text),
            Some(json!({"summary": "uses {curly} and \"quotes\"", "n": 2}))
        );
    }

    #[test]
    fn test_skips_unparseable_span() {
        let text = "Set {x} is empty. Result: {\"ok\": true}";
        assert_eq!(extract_json(text), Some(json!({"ok": true})));
    }

    #[test]
    fn test_scalars_are_not_analyses() {
        assert_eq!(extract_json("42"), None);
        assert_eq!(extract_json("\"just a string\""), None);
        assert_eq!(extract_json(""), None);
    }

    #[test]
    fn test_parse_analysis_keeps_raw_text() {
        let failure = parse_analysis("I could not decide.").unwrap_err();
        assert_eq!(failure.raw_output.as_deref(), Some("I could not decide."));
        assert!(failure.message.contains("no JSON"));
    }

    #[test]
    fn test_deeply_nested_prose_braces_are_skipped_whole() {
        let depth = 20_000;
        let text = format!(
            "Consider {}x{} then: {{\"ok\": true}}",
            "{".repeat(depth),
            "}".repeat(depth)
        );
        assert_eq!(extract_json(&text), Some(json!({"ok": true})));
    }

    #[test]
    fn test_many_unparseable_spans_before_answer() {
        let text = format!("{}[\"done\"]", "{x} ".repeat(5_000));
        assert_eq!(extract_json(&text), Some(json!(["done"])));
    }
}
