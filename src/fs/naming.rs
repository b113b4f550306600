//! Script file naming.

use crate::error::{Error, Result};

/// File name the script for `id` is saved under.
pub fn script_file_name(id: &str, extension: &str) -> Result<String> {
    let name = format!("{}.{}", id, extension);
    validate_file_name(&name)?;
    Ok(name)
}

/// Reject names that could escape the destination directory.
pub fn validate_file_name(name: &str) -> Result<&str> {
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(format!(
            "Path separators not allowed in filename: '{}'",
            name
        )));
    }

    if name.chars().any(|c| c == '\0' || c.is_control()) {
        return Err(Error::InvalidFilename(format!(
            "Control characters not allowed in filename: '{}'",
            name.escape_default()
        )));
    }

    if name.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(name)
}
