//! Chat-completion request payload.

use serde::{Deserialize, Serialize};

use hostscope_telemetry::TelemetrySnapshot;

/// Instruction sent as the system message.
pub const SYSTEM_PROMPT: &str = "You are a telemetry analyst. Provide concise feedback \
highlighting potential issues or anomalies.";

/// Text preceding the embedded snapshot in the user message.
pub const USER_PROMPT_PREFIX: &str = "Here is a telemetry snapshot. Summarize notable points and \
suggest next steps if something looks problematic.";

/// Sampling temperature of every request.
pub const TEMPERATURE: f64 = 0.2;

/// One chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for a chat-completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
}

impl ChatRequest {
    /// Build the two-message analysis conversation for one snapshot.
    pub fn for_snapshot(model: &str, snapshot: &TelemetrySnapshot) -> serde_json::Result<Self> {
        Ok(Self::for_snapshot_json(model, &snapshot.to_json()?))
    }

    /// Build the conversation around an already rendered snapshot document.
    pub fn for_snapshot_json(model: &str, snapshot_json: &str) -> Self {
        let user = format!("{USER_PROMPT_PREFIX}\n\n```json\n{snapshot_json}\n```");

        Self {
            model: model.to_string(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)],
            temperature: TEMPERATURE,
        }
    }
}
