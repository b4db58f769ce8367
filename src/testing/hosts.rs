//! Target host list loading

use std::path::Path;

use crate::common::{Error, Result};

/// Split raw target text into hosts, one per `'\n'`.
///
/// No trimming, deduplication or filtering: a trailing newline yields a
/// trailing empty host and `\r` from CRLF files stays on the entry.
pub fn parse_hosts(data: &str) -> Vec<String> {
    data.split('\n').map(str::to_string).collect()
}

/// Read a targets file and split it into hosts
pub fn load_hosts(path: &Path) -> Result<Vec<String>> {
    let bytes = std::fs::read(path).map_err(|e| Error::file_read(path, &e))?;
    Ok(parse_hosts(&String::from_utf8_lossy(&bytes)))
}
