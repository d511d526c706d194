//! One collection pass followed by at most one analysis request.

use anyhow::{Context, Result};
use tracing::info;

use hostscope_analysis::AnalysisClient;
use hostscope_telemetry::TelemetryCollector;

use crate::config::Config;

/// Collect a snapshot and produce the text to print on stdout.
///
/// In collect-only mode this is the snapshot JSON and no network call is
/// made. Otherwise it is the analysis text, or the whole result as JSON when
/// `raw_response` is set.
pub fn run(config: &Config) -> Result<String> {
    config.validate()?;

    let collector = TelemetryCollector::with_proc_root(&config.telemetry.proc_root);
    let snapshot = collector.collect();

    if config.collect_only {
        info!("Collect-only mode, skipping analysis");
        return snapshot.to_json().context("Failed to serialize telemetry snapshot");
    }

    let client = AnalysisClient::new(config.analysis.settings())?;

    info!(
        model = %config.analysis.model,
        endpoint = %config.analysis.endpoint,
        "Requesting telemetry analysis"
    );

    let result = client.analyze(&snapshot)?;

    if config.raw_response {
        return serde_json::to_string_pretty(&result).context("Failed to serialize analysis result");
    }

    Ok(result.analysis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[test]
    fn test_collect_only_without_api_key() {
        let mut config = Config {
            collect_only: true,
            ..Config::default()
        };
        // Nothing listens here; a network attempt would fail the run.
        config.analysis.endpoint = "http://127.0.0.1:9/v1/chat/completions".to_string();
        config.analysis.timeout_secs = 0.5;

        let output = run(&config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        for key in ["memory", "platform", "process", "timestamp"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_collect_only_uses_proc_root() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("meminfo"), "MemTotal: 64 kB\n").unwrap();

        let mut config = Config {
            collect_only: true,
            ..Config::default()
        };
        config.telemetry.proc_root = root.path().to_string_lossy().to_string();

        let value: serde_json::Value = serde_json::from_str(&run(&config).unwrap()).unwrap();
        assert_eq!(value["memory"], serde_json::json!({"MemTotal": "64 kB"}));
    }

    #[test]
    fn test_missing_api_key_fails_before_network() {
        let mut config = Config::default();
        config.analysis.endpoint = "http://127.0.0.1:9/v1/chat/completions".to_string();

        let err = run(&config).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_unreachable_endpoint_is_reported() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let mut config = Config::default();
        config.analysis.api_key = Some("sk-test".to_string());
        config.analysis.endpoint = format!("http://{addr}/v1/chat/completions");
        config.analysis.timeout_secs = 2.0;

        let err = run(&config).unwrap_err();
        let analysis_err = err
            .downcast_ref::<hostscope_analysis::AnalysisError>()
            .expect("analysis error");
        assert!(analysis_err.is_transport());
    }
}
