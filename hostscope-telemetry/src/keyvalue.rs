//! Parser for colon-delimited `key: value` files such as `/proc/meminfo`.

use std::collections::BTreeMap;
use std::path::Path;
use tracing::trace;

/// Open-ended string mapping discovered at parse time.
pub type KeyValueMap = BTreeMap<String, String>;

/// Read and parse a `key: value` file.
///
/// Any read failure (missing file, permission denied, invalid UTF-8) yields
/// an empty map. Callers treat this as an omission, never as an error.
pub fn parse_key_value_file<P: AsRef<Path>>(path: P) -> KeyValueMap {
    let path = path.as_ref();

    match std::fs::read_to_string(path) {
        Ok(content) => parse_key_value_str(&content),
        Err(e) => {
            trace!(path = %path.display(), error = %e, "Optional telemetry file unavailable");
            KeyValueMap::new()
        }
    }
}

/// Parse `key: value` lines from text.
///
/// Blank lines and lines without a colon are skipped. The first colon splits
/// the line; both sides are trimmed and the value keeps any further colons.
/// A repeated key keeps its last value.
pub fn parse_key_value_str(content: &str) -> KeyValueMap {
    let mut parsed = KeyValueMap::new();

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if let Some((key, value)) = line.split_once(':') {
            parsed.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    parsed
}
