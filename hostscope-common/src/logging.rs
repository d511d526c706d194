//! Logging initialization using tracing.

use anyhow::{anyhow, Result};
use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Accepted log level names.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Normalize and check a log level name.
pub fn parse_level(level: &str) -> Result<String> {
    let level = level.trim().to_lowercase();
    if LOG_LEVELS.contains(&level.as_str()) {
        Ok(level)
    } else {
        Err(anyhow!("Invalid log level '{}', expected one of {:?}", level, LOG_LEVELS))
    }
}

fn env_filter(level: &str) -> Result<EnvFilter> {
    let level = parse_level(level)?;
    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
}

/// Initialize the tracing subscriber with the specified log level.
///
/// `RUST_LOG` takes precedence over `level` when set.
///
/// # Arguments
/// * `level` - Log level string (trace, debug, info, warn, error)
pub fn init_logging(level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::registry()
        .with(env_filter(level)?)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
        );

    subscriber
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}

/// Initialize logging with JSON output format.
/// Suitable for log aggregation pipelines.
pub fn init_logging_json(level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::registry()
        .with(env_filter(level)?)
        .with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
        );

    subscriber
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}
