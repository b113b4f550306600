//! Archive validation and member extraction.

use std::io::{Cursor, Read};

use crate::error::{Error, Result};

/// Leading bytes of every ZIP local file header.
pub const ARCHIVE_MAGIC: &[u8; 2] = b"PK";

/// Shortest buffer that can hold a ZIP signature.
const MIN_ARCHIVE_LEN: usize = 4;

/// Check the container magic before handing the buffer to the ZIP parser.
///
/// Error pages served with a 200 status fail here instead of deep inside the
/// parser.
pub fn validate_magic(data: &[u8]) -> Result<()> {
    if data.len() < MIN_ARCHIVE_LEN || !data.starts_with(ARCHIVE_MAGIC) {
        let preview = String::from_utf8_lossy(&data[..data.len().min(32)]);
        return Err(Error::ContentInvalid(format!(
            "Response is not a ZIP archive ({} bytes, starts with {:?})",
            data.len(),
            preview
        )));
    }
    Ok(())
}

/// Read the first member whose base name equals `file_name`.
pub fn extract_member(data: &[u8], file_name: &str) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() || base_name(entry.name()) != file_name {
            continue;
        }

        tracing::debug!("Found {} as archive member {}", file_name, entry.name());
        let mut contents = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry.read_to_end(&mut contents).map_err(|e| {
            Error::ContentInvalid(format!("Failed to read archive member {}: {}", file_name, e))
        })?;
        return Ok(contents);
    }

    Err(Error::NotFound(format!(
        "{} not present in archive ({} members)",
        file_name,
        archive.len()
    )))
}

/// Final path component of an archive member name.
fn base_name(name: &str) -> &str {
    name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or(name)
}
