//! JSON extraction from generative-service output.
//!
//! The first fenced code block whose body parses as JSON wins; otherwise the first top-level
//! JSON object in the text. Anything else is [`AnalysisError::MalformedUpstreamOutput`]:
//! there is no degradation path.

use crate::error::{AnalysisError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").expect("fence pattern is valid")
});

/// Pull the first parseable JSON value out of free text
pub fn extract_json(text: &str) -> Result<Value> {
    for caps in FENCED_BLOCK.captures_iter(text) {
        let body = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        if body.is_empty() {
            continue;
        }
        if let Ok(value) = serde_json::from_str::<Value>(body) {
            return Ok(value);
        }
    }

    if let Some(value) = first_top_level_object(text) {
        return Ok(value);
    }

    Err(AnalysisError::malformed_upstream(
        "no JSON code block or object found in output",
    ))
}

/// First balanced `{...}` span at nesting depth zero that parses as an object
///
/// Braces nested inside an unterminated span are never tried on their own, so truncated
/// output fails instead of yielding one of its inner objects.
fn first_top_level_object(text: &str) -> Option<Value> {
    let mut depth = 0usize;
    let mut start = 0;
    let mut in_string = false;
    let mut escaped = false;

    for (i, b) in text.bytes().enumerate() {
        if depth == 0 {
            if b == b'{' {
                start = i;
                depth = 1;
            }
            continue;
        }
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
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    if let Ok(value @ Value::Object(_)) =
                        serde_json::from_str::<Value>(&text[start..=i])
                    {
                        return Some(value);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// Extract and deserialize upstream output into `T`
pub fn parse_upstream<T: DeserializeOwned>(text: &str) -> Result<T> {
    let value = extract_json(text)?;
    serde_json::from_value(value).map_err(|e| AnalysisError::malformed_upstream(e.to_string()))
}

/// Like [`parse_upstream`], but unwraps `{"<field>": ...}` when the output is wrapped
pub fn parse_upstream_field<T: DeserializeOwned>(text: &str, field: &str) -> Result<T> {
    let value = match extract_json(text)? {
        Value::Object(mut map) if map.contains_key(field) => map.remove(field).unwrap_or_default(),
        other => other,
    };
    serde_json::from_value(value)
        .map_err(|e| AnalysisError::malformed_upstream(format!("{field}: {e}")))
}
