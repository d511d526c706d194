//! Load average collection.

use serde::{Deserialize, Serialize};

/// System load averages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadAverage {
    #[serde(rename = "15min")]
    pub fifteen: f64,
    #[serde(rename = "1min")]
    pub one: f64,
    #[serde(rename = "5min")]
    pub five: f64,
}

/// Read the 1, 5 and 15 minute load averages.
///
/// Returns `None` when the host has no load-average facility or it fails.
/// `None` means "unsupported", never "zero load".
#[cfg(unix)]
pub fn collect_load_average() -> Option<LoadAverage> {
    let mut loads = [0f64; 3];
    // SAFETY: the buffer holds exactly the three samples requested.
    let filled = unsafe { libc::getloadavg(loads.as_mut_ptr(), 3) };
    if filled != 3 {
        tracing::debug!(filled, "getloadavg unavailable, omitting load average");
        return None;
    }

    Some(LoadAverage {
        fifteen: loads[2],
        one: loads[0],
        five: loads[1],
    })
}

/// Read the 1, 5 and 15 minute load averages.
///
/// This platform has no load-average facility.
#[cfg(not(unix))]
pub fn collect_load_average() -> Option<LoadAverage> {
    None
}
