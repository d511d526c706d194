//! Blocking client for the chat-completions endpoint.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, instrument};

use hostscope_telemetry::TelemetrySnapshot;

use crate::error::{AnalysisError, Result};
use crate::request::ChatRequest;
use crate::response::AnalysisResult;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// Connection parameters for the analysis endpoint.
#[derive(Clone)]
pub struct AnalysisSettings {
    /// Bearer token
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// Chat-completions URL
    pub endpoint: String,
    /// Whole-request timeout in seconds
    pub timeout_secs: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for AnalysisSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AnalysisSettings {
    /// Timeout as a [`Duration`], rejecting zero, negative and non-finite values.
    pub fn timeout(&self) -> Result<Duration> {
        if !self.timeout_secs.is_finite() || self.timeout_secs <= 0.0 {
            return Err(AnalysisError::InvalidTimeout(self.timeout_secs));
        }
        Ok(Duration::from_secs_f64(self.timeout_secs))
    }
}

/// Client that sends snapshots for analysis.
///
/// Each call to [`AnalysisClient::analyze`] is a single round trip. There are
/// no retries.
pub struct AnalysisClient {
    settings: AnalysisSettings,
    http_client: Client,
}

impl AnalysisClient {
    /// Create a client. Fails before any network activity if the API key is
    /// missing or the timeout is invalid.
    pub fn new(settings: AnalysisSettings) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(AnalysisError::MissingApiKey);
        }

        let http_client = Client::builder()
            .timeout(settings.timeout()?)
            .build()
            .map_err(AnalysisError::ClientInit)?;

        Ok(Self {
            settings,
            http_client,
        })
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Send one snapshot and extract the answer.
    #[instrument(skip_all, fields(model = %self.settings.model, endpoint = %self.settings.endpoint))]
    pub fn analyze(&self, snapshot: &TelemetrySnapshot) -> Result<AnalysisResult> {
        let request = ChatRequest::for_snapshot(&self.settings.model, snapshot)
            .map_err(AnalysisError::Encode)?;
        let raw_response = self.send(&request)?;
        let result = AnalysisResult::from_response(raw_response);

        debug!(analysis_len = result.analysis.len(), "Analysis received");

        Ok(result)
    }

    /// POST a request body and decode the JSON response.
    pub fn send(&self, request: &ChatRequest) -> Result<Value> {
        let body = serde_json::to_vec(request).map_err(AnalysisError::Encode)?;

        debug!(bytes = body.len(), "Sending analysis request");

        let response = self
            .http_client
            .post(&self.settings.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.settings.api_key)
            .body(body)
            .send()
            .map_err(|e| AnalysisError::Transport(error_chain(&e)))?;

        let status = response.status();
        debug!(status = status.as_u16(), "Analysis endpoint responded");

        if !status.is_success() {
            // Best effort: an unreadable error body is reported as empty.
            let body = response
                .bytes()
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .unwrap_or_default();
            return Err(AnalysisError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .map_err(|e| AnalysisError::Transport(error_chain(&e)))?;

        serde_json::from_slice(&bytes).map_err(AnalysisError::InvalidResponse)
    }
}

/// Analyze one snapshot with a freshly built client.
pub fn analyze(
    snapshot: &TelemetrySnapshot,
    model: &str,
    endpoint: &str,
    api_key: &str,
    timeout_secs: f64,
) -> Result<AnalysisResult> {
    AnalysisClient::new(AnalysisSettings {
        api_key: api_key.to_string(),
        model: model.to_string(),
        endpoint: endpoint.to_string(),
        timeout_secs,
    })?
    .analyze(snapshot)
}

/// Render an error with all of its sources, outermost first.
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
