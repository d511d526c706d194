//! # hostscope Common
//!
//! Shared utilities for the hostscope components.
//!
//! ## Logging
//!
//! Log output is written to stderr so stdout stays reserved for the
//! snapshot document or the analysis text:
//!
//! ```rust,no_run
//! hostscope_common::init_logging("info").unwrap();
//! tracing::info!("ready");
//! ```

pub mod logging;

pub use logging::{init_logging, init_logging_json, parse_level, LOG_LEVELS};
