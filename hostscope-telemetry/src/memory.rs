//! Memory information collection.

use std::path::Path;

use crate::keyvalue::{parse_key_value_file, KeyValueMap};

/// Name of the memory statistics file under the proc root.
pub const MEMINFO_FILE: &str = "meminfo";

/// Collect memory statistics from `<proc_root>/meminfo`.
///
/// Returns an empty map when the file is missing or unreadable.
pub fn collect_memory_info(proc_root: &Path) -> KeyValueMap {
    parse_key_value_file(proc_root.join(MEMINFO_FILE))
}
