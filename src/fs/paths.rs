//! Destination directory management and script persistence.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::naming::validate_file_name;

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Write `data` to `<dir>/<file_name>`, replacing any existing file.
///
/// Returns the full path written.
pub fn save_script(dir: &Path, file_name: &str, data: &[u8]) -> Result<PathBuf> {
    let file_name = validate_file_name(file_name)?;
    let dir = std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf());
    ensure_dir(&dir)?;

    let path = dir.join(file_name);
    std::fs::write(&path, data)?;
    tracing::info!("Saved {} ({} bytes)", path.display(), data.len());

    Ok(path)
}
