//! Platform identity collection.

use serde::{Deserialize, Serialize};

/// Value reported in the `runtime` field.
pub const RUNTIME_ID: &str = concat!("hostscope ", env!("CARGO_PKG_VERSION"));

/// Static platform identity.
///
/// Field order is alphabetical so that the serialized form is key-sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Machine architecture (e.g. `x86_64`)
    pub machine: String,
    /// Kernel/OS release string
    pub release: String,
    /// Version identifier of the collecting program
    pub runtime: String,
    /// Operating system name (e.g. `Linux`)
    pub system: String,
    /// Kernel/OS version string
    pub version: String,
}

/// Collect platform identity. Always succeeds; unknown fields are empty.
#[cfg(unix)]
pub fn collect_platform_info() -> PlatformInfo {
    use std::ffi::CStr;

    // SAFETY: utsname is plain C data; all-zero bytes are a valid value.
    let mut uts: libc::utsname = unsafe { std::mem::zeroed() };
    // SAFETY: uname fills the caller-provided struct and NUL-terminates each field.
    let rc = unsafe { libc::uname(&mut uts) };
    if rc != 0 {
        tracing::debug!("uname failed, reporting empty platform fields");
        return PlatformInfo {
            machine: std::env::consts::ARCH.to_string(),
            release: String::new(),
            runtime: RUNTIME_ID.to_string(),
            system: String::new(),
            version: String::new(),
        };
    }

    // SAFETY: every field is NUL-terminated within its array after a
    // successful uname, and the zeroed tail terminates it otherwise.
    let field = |raw: &[libc::c_char]| unsafe {
        CStr::from_ptr(raw.as_ptr()).to_string_lossy().into_owned()
    };

    PlatformInfo {
        machine: field(&uts.machine[..]),
        release: field(&uts.release[..]),
        runtime: RUNTIME_ID.to_string(),
        system: field(&uts.sysname[..]),
        version: field(&uts.version[..]),
    }
}

/// Collect platform identity. Always succeeds; unknown fields are empty.
#[cfg(not(unix))]
pub fn collect_platform_info() -> PlatformInfo {
    use sysinfo::System;

    PlatformInfo {
        machine: std::env::consts::ARCH.to_string(),
        release: System::kernel_version().unwrap_or_default(),
        runtime: RUNTIME_ID.to_string(),
        system: System::name().unwrap_or_default(),
        version: System::os_version().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_identifies_collector() {
        let info = collect_platform_info();
        assert_eq!(info.runtime, RUNTIME_ID);
        assert!(info.runtime.starts_with("hostscope "));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_linux_identity() {
        let info = collect_platform_info();
        assert_eq!(info.system, "Linux");
        assert!(!info.release.is_empty());
        assert!(!info.machine.is_empty());
    }

    #[test]
    fn test_serializes_sorted_fields() {
        let info = PlatformInfo {
            machine: "m".into(),
            release: "r".into(),
            runtime: "rt".into(),
            system: "s".into(),
            version: "v".into(),
        };
        let json = serde_json::to_string(&info).unwrap();
        assert_eq!(
            json,
            r#"{"machine":"m","release":"r","runtime":"rt","system":"s","version":"v"}"#
        );
    }
}
