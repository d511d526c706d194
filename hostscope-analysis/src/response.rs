//! Analysis result and text extraction from chat-completion responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of one analysis round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// First non-empty answer text, trimmed; empty if none was found
    pub analysis: String,
    /// Decoded response body
    pub raw_response: Value,
}

impl AnalysisResult {
    pub fn from_response(raw_response: Value) -> Self {
        Self {
            analysis: extract_message(&raw_response),
            raw_response,
        }
    }
}

/// Find the answer text in a chat-completion response.
///
/// Walks `choices[*].message.content` in order and returns the first string
/// that is non-empty after trimming. Missing or mistyped fields are skipped;
/// when nothing qualifies the result is an empty string.
pub fn extract_message(response: &Value) -> String {
    let Some(choices) = response.get("choices").and_then(Value::as_array) else {
        return String::new();
    };

    choices
        .iter()
        .filter_map(|choice| choice.get("message")?.get("content")?.as_str())
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
        .unwrap_or_default()
}
