//! Current-process resource usage collection.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

use crate::keyvalue::{parse_key_value_file, KeyValueMap};

/// Resource usage of the collecting process.
///
/// The fixed counters are always present. `status` holds the raw key/value
/// pairs of the per-process status file and is merged into the same mapping
/// when serialized; a status key equal to a fixed field name replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessInfo {
    /// Process ID
    pub pid: u32,
    /// User CPU time in seconds
    pub cpu_time_user: f64,
    /// System CPU time in seconds
    pub cpu_time_system: f64,
    /// User CPU time of reaped children in seconds
    pub cpu_time_children_user: f64,
    /// System CPU time of reaped children in seconds
    pub cpu_time_children_system: f64,
    /// Elapsed real time in seconds
    pub elapsed: f64,
    /// Entries of `<proc_root>/<pid>/status`
    pub status: KeyValueMap,
}

impl Serialize for ProcessInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut merged: BTreeMap<&str, Value> = BTreeMap::new();
        merged.insert("pid", Value::from(self.pid));
        merged.insert("cpu_time_user", Value::from(self.cpu_time_user));
        merged.insert("cpu_time_system", Value::from(self.cpu_time_system));
        merged.insert("cpu_time_children_user", Value::from(self.cpu_time_children_user));
        merged.insert("cpu_time_children_system", Value::from(self.cpu_time_children_system));
        merged.insert("elapsed", Value::from(self.elapsed));
        for (key, value) in &self.status {
            merged.insert(key.as_str(), Value::from(value.as_str()));
        }
        serializer.collect_map(merged)
    }
}

impl<'de> Deserialize<'de> for ProcessInfo {
    /// Numbers under fixed field names fill the counters; every string value
    /// is a status entry, including one that replaced a fixed field.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<String, Value>::deserialize(deserializer)?;

        let mut info = ProcessInfo {
            pid: 0,
            cpu_time_user: 0.0,
            cpu_time_system: 0.0,
            cpu_time_children_user: 0.0,
            cpu_time_children_system: 0.0,
            elapsed: 0.0,
            status: KeyValueMap::new(),
        };

        for (key, value) in entries {
            let seconds = value.as_f64();
            match (key.as_str(), value) {
                ("pid", Value::Number(n)) => {
                    info.pid = n
                        .as_u64()
                        .and_then(|pid| u32::try_from(pid).ok())
                        .ok_or_else(|| D::Error::custom(format!("invalid pid {n}")))?;
                }
                ("cpu_time_user", Value::Number(_)) => info.cpu_time_user = seconds.unwrap_or_default(),
                ("cpu_time_system", Value::Number(_)) => info.cpu_time_system = seconds.unwrap_or_default(),
                ("cpu_time_children_user", Value::Number(_)) => {
                    info.cpu_time_children_user = seconds.unwrap_or_default()
                }
                ("cpu_time_children_system", Value::Number(_)) => {
                    info.cpu_time_children_system = seconds.unwrap_or_default()
                }
                ("elapsed", Value::Number(_)) => info.elapsed = seconds.unwrap_or_default(),
                (_, Value::String(text)) => {
                    info.status.insert(key.clone(), text);
                }
                (_, other) => {
                    return Err(D::Error::custom(format!(
                        "unexpected value for process key '{key}': {other}"
                    )));
                }
            }
        }

        Ok(info)
    }
}

/// CPU and wall-clock counters for the current process.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProcessTimes {
    pub user: f64,
    pub system: f64,
    pub children_user: f64,
    pub children_system: f64,
    pub elapsed: f64,
}

/// Collect process counters and the status file for the current process.
pub fn collect_process_info(proc_root: &Path) -> ProcessInfo {
    let pid = std::process::id();
    let times = process_times();
    let status = parse_key_value_file(proc_root.join(pid.to_string()).join("status"));

    ProcessInfo {
        pid,
        cpu_time_user: times.user,
        cpu_time_system: times.system,
        cpu_time_children_user: times.children_user,
        cpu_time_children_system: times.children_system,
        elapsed: times.elapsed,
        status,
    }
}

/// Read the process timing counters via `times(2)`.
#[cfg(unix)]
pub fn process_times() -> ProcessTimes {
    // SAFETY: sysconf has no memory-safety preconditions.
    let hz = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if hz <= 0 {
        tracing::debug!(hz, "clock tick rate unavailable");
        return ProcessTimes::default();
    }
    let hz = hz as f64;

    // SAFETY: tms is plain C data; all-zero bytes are a valid value.
    let mut tms: libc::tms = unsafe { std::mem::zeroed() };
    // SAFETY: times writes into the caller-provided struct.
    let ticks = unsafe { libc::times(&mut tms) };
    if ticks as i64 == -1 {
        tracing::debug!("times(2) failed");
        return ProcessTimes::default();
    }

    ProcessTimes {
        user: tms.tms_utime as f64 / hz,
        system: tms.tms_stime as f64 / hz,
        children_user: tms.tms_cutime as f64 / hz,
        children_system: tms.tms_cstime as f64 / hz,
        elapsed: ticks as f64 / hz,
    }
}

/// Read the process timing counters.
///
/// CPU times are not exposed here; elapsed is the process run time.
#[cfg(not(unix))]
pub fn process_times() -> ProcessTimes {
    use sysinfo::{Pid, ProcessesToUpdate, System};

    let pid = Pid::from_u32(std::process::id());
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

    ProcessTimes {
        elapsed: system.process(pid).map(|p| p.run_time() as f64).unwrap_or(0.0),
        ..ProcessTimes::default()
    }
}
