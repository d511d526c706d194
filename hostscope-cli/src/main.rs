//! # hostscope
//!
//! Collects a point-in-time telemetry snapshot of the local host (platform,
//! load, memory, process usage) and sends it to a chat-completions endpoint
//! for a short natural-language analysis.
//!
//! ## Usage
//! ```bash
//! # Print the snapshot only
//! hostscope --collect-only
//!
//! # Ask for an analysis (key from OPENAI_API_KEY or --api-key)
//! hostscope --model gpt-4o-mini --timeout 20
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::debug;

mod app;
mod cli;
mod config;

use cli::Args;
use config::{Config, LogFormat};

fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    let config = Config::resolve(&args)?;

    // Initialize logging
    match config.logging.format {
        LogFormat::Pretty => hostscope_common::init_logging(&config.logging.level)?,
        LogFormat::Json => hostscope_common::init_logging_json(&config.logging.level)?,
    }

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        collect_only = config.collect_only,
        "Starting hostscope"
    );

    let output = app::run(&config)?;
    println!("{output}");

    Ok(())
}
