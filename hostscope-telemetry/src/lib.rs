//! # hostscope Telemetry
//!
//! Point-in-time telemetry snapshots of the local host: platform identity,
//! load average, memory statistics and resource usage of the collecting
//! process.
//!
//! ## Best-effort collection
//!
//! Every sub-collector is independent and never fails. A missing facility or
//! unreadable file turns into absent or empty data, so `collect()` always
//! produces a usable (possibly partial) snapshot.
//!
//! ```rust,no_run
//! use hostscope_telemetry::TelemetryCollector;
//!
//! let snapshot = TelemetryCollector::new().collect();
//! println!("{}", snapshot.to_json().unwrap());
//! ```

pub mod keyvalue;
pub mod load;
pub mod memory;
pub mod process;
pub mod system;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub use keyvalue::{parse_key_value_file, parse_key_value_str, KeyValueMap};
pub use load::LoadAverage;
pub use process::ProcessInfo;
pub use system::PlatformInfo;

/// Default mount point of procfs.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Immutable telemetry snapshot.
///
/// Serializes to a JSON object with keys sorted at every level; see
/// [`TelemetrySnapshot::to_json`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    load_average: Option<LoadAverage>,
    memory: KeyValueMap,
    platform: PlatformInfo,
    process: ProcessInfo,
    timestamp: f64,
}

impl TelemetrySnapshot {
    /// Assemble a snapshot from already collected sections.
    pub fn new(
        timestamp: f64,
        platform: PlatformInfo,
        load_average: Option<LoadAverage>,
        memory: KeyValueMap,
        process: ProcessInfo,
    ) -> Self {
        Self {
            load_average,
            memory,
            platform,
            process,
            timestamp,
        }
    }

    /// Seconds since the Unix epoch at collection start.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    pub fn platform(&self) -> &PlatformInfo {
        &self.platform
    }

    /// `None` when the host has no load-average facility.
    pub fn load_average(&self) -> Option<&LoadAverage> {
        self.load_average.as_ref()
    }

    pub fn memory(&self) -> &KeyValueMap {
        &self.memory
    }

    pub fn process(&self) -> &ProcessInfo {
        &self.process
    }

    /// Convert to a JSON value. Objects are key-sorted maps.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Render as pretty-printed JSON with sorted keys and 2-space indentation.
    ///
    /// Identical snapshots always render to identical bytes.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.to_value()?)
    }
}

/// Collector that assembles [`TelemetrySnapshot`]s.
#[derive(Debug, Clone)]
pub struct TelemetryCollector {
    proc_root: PathBuf,
}

impl TelemetryCollector {
    /// Create a collector reading from `/proc`.
    pub fn new() -> Self {
        Self::with_proc_root(DEFAULT_PROC_ROOT)
    }

    /// Create a collector reading memory and status files below `proc_root`.
    pub fn with_proc_root<P: Into<PathBuf>>(proc_root: P) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    pub fn proc_root(&self) -> &Path {
        &self.proc_root
    }

    /// Collect a snapshot. Never fails.
    pub fn collect(&self) -> TelemetrySnapshot {
        let timestamp = unix_timestamp();

        let platform = system::collect_platform_info();
        let load_average = load::collect_load_average();
        let memory = memory::collect_memory_info(&self.proc_root);
        let process = process::collect_process_info(&self.proc_root);

        debug!(
            proc_root = %self.proc_root.display(),
            has_load_average = load_average.is_some(),
            memory_keys = memory.len(),
            status_keys = process.status.len(),
            "Telemetry snapshot collected"
        );

        TelemetrySnapshot::new(timestamp, platform, load_average, memory, process)
    }
}

impl Default for TelemetryCollector {
    fn default() -> Self {
        Self::new()
    }
}

fn unix_timestamp() -> f64 {
    let now = chrono::Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_nanos()) / 1e9
}
