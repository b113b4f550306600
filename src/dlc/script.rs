//! Reading registrations from, and appending them to, a saved script.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use regex::Regex;

use crate::error::{Error, Result};

/// Identifiers already registered in `content`, keyed or not.
pub fn registered_ids(content: &str, register_call: &str) -> Result<HashSet<u64>> {
    let pattern = Regex::new(&format!(
        r"{}\s*\(\s*([0-9]+)",
        regex::escape(register_call)
    ))
    .map_err(|e| Error::Config(format!("Invalid registration pattern: {}", e)))?;

    Ok(pattern
        .captures_iter(content)
        .filter_map(|caps| caps[1].parse().ok())
        .collect())
}

/// Read the script at `path`; a missing file reads as empty.
pub fn read_script(path: &Path) -> Result<String> {
    match fs::read(path) {
        Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Append one bare registration line per identifier.
///
/// A newline is written first when the existing content does not end with
/// one. A line that fails to write is logged and skipped. Returns the
/// identifiers actually written.
pub fn append_registrations(
    path: &Path,
    existing: &str,
    ids: &[String],
    register_call: &str,
) -> Result<Vec<String>> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    if !existing.is_empty() && !existing.ends_with('\n') {
        file.write_all(b"\n")?;
    }

    let mut written = Vec::with_capacity(ids.len());
    for id in ids {
        let line = format!("{}({})\n", register_call, id);
        match file.write_all(line.as_bytes()) {
            Ok(()) => {
                tracing::info!("Added {}", line.trim_end());
                written.push(id.clone());
            }
            Err(e) => tracing::warn!("Failed to append {}: {}", line.trim_end(), e),
        }
    }

    file.flush()?;
    Ok(written)
}
