//! Document storage: read config text, write it back all-or-nothing.
//!
//! Writes go to a temporary file in the target's directory which is then
//! renamed over the target, so an interrupted or failed save never leaves a
//! half-written config behind. Parent directories are created as needed, and
//! a replaced file keeps its permissions.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::XrayfigError;

/// Read a document's text.
pub fn read_document(path: &Path) -> Result<String, XrayfigError> {
    std::fs::read_to_string(path).map_err(|e| XrayfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Atomically replace (or create) `path` with `text`.
pub fn write_document(path: &Path, text: &str) -> Result<(), XrayfigError> {
    let io_err = |source: std::io::Error| XrayfigError::IoError {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| XrayfigError::IoError {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(text.as_bytes()).map_err(io_err)?;
    // The temp file starts out private; keep the mode of the file it replaces.
    if let Ok(meta) = std::fs::metadata(path) {
        tmp.as_file()
            .set_permissions(meta.permissions())
            .map_err(io_err)?;
    }
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;

    tracing::info!(path = %path.display(), bytes = text.len(), "document written");
    Ok(())
}
