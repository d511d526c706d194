//! Error types for the analysis client.

use thiserror::Error;

/// Errors that can occur while requesting an analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// No API key was supplied.
    #[error("An API key is required to request an analysis")]
    MissingApiKey,

    /// The request timeout is not a positive, finite number of seconds.
    #[error("Invalid request timeout: {0} seconds")]
    InvalidTimeout(f64),

    /// The HTTP client could not be constructed.
    #[error("Failed to initialize HTTP client: {0}")]
    ClientInit(#[source] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("Analysis endpoint returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The endpoint could not be reached or the exchange did not complete.
    #[error("Failed to reach analysis endpoint: {0}")]
    Transport(String),

    /// The request body could not be encoded.
    #[error("Failed to encode analysis request: {0}")]
    Encode(#[source] serde_json::Error),

    /// A successful response carried a body that is not JSON.
    #[error("Analysis endpoint returned an invalid JSON body: {0}")]
    InvalidResponse(#[source] serde_json::Error),
}

impl AnalysisError {
    /// HTTP status code for protocol errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            AnalysisError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the failure happened before a response was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(self, AnalysisError::Transport(_))
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
