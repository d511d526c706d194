//! Command-line argument parsing.

use clap::Parser;

/// hostscope - Collect host telemetry and ask a chat model to analyze it
#[derive(Parser, Debug, Default)]
#[command(name = "hostscope")]
#[command(about = "Collect telemetry and send it to a chat-completion API for analysis")]
#[command(version)]
pub struct Args {
    /// Path to configuration file (optional, defaults used if not found)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    /// Chat model to use (default: gpt-4o-mini)
    #[arg(long)]
    pub model: Option<String>,

    /// Chat-completions endpoint (default: https://api.openai.com/v1/chat/completions)
    #[arg(long)]
    pub endpoint: Option<String>,

    /// API key for the analysis endpoint
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Timeout for the API request in seconds (default: 30)
    #[arg(long)]
    pub timeout: Option<f64>,

    /// Collect telemetry and print it without calling the API
    #[arg(long)]
    pub collect_only: bool,

    /// Print the full analysis result (text and raw response) as JSON
    #[arg(long)]
    pub raw_response: bool,

    /// Root of the proc filesystem to read memory and status files from
    #[arg(long)]
    pub proc_root: Option<String>,
}
