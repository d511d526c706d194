//! # hostscope Analysis
//!
//! Sends a [`TelemetrySnapshot`](hostscope_telemetry::TelemetrySnapshot) to a
//! chat-completions endpoint and extracts the textual answer.
//!
//! The exchange is a single blocking POST bounded by the configured timeout:
//!
//! ```rust,no_run
//! use hostscope_analysis::{AnalysisClient, AnalysisSettings};
//! use hostscope_telemetry::TelemetryCollector;
//!
//! let client = AnalysisClient::new(AnalysisSettings {
//!     api_key: "sk-...".to_string(),
//!     ..AnalysisSettings::default()
//! })?;
//! let result = client.analyze(&TelemetryCollector::new().collect())?;
//! println!("{}", result.analysis);
//! # Ok::<(), hostscope_analysis::AnalysisError>(())
//! ```
//!
//! ## Failure modes
//!
//! | Situation | Outcome |
//! |-----------|---------|
//! | Missing API key | `AnalysisError::MissingApiKey`, no request sent |
//! | Non-2xx status | `AnalysisError::Http` with status and body text |
//! | DNS, connect or timeout failure | `AnalysisError::Transport` |
//! | 2xx without any answer text | `Ok` with an empty `analysis` |

pub mod client;
pub mod error;
pub mod request;
pub mod response;

pub use client::{
    analyze, AnalysisClient, AnalysisSettings, DEFAULT_ENDPOINT, DEFAULT_MODEL,
    DEFAULT_TIMEOUT_SECS,
};
pub use error::{AnalysisError, Result};
pub use request::{ChatMessage, ChatRequest, SYSTEM_PROMPT, TEMPERATURE, USER_PROMPT_PREFIX};
pub use response::{extract_message, AnalysisResult};
