//! Ownership marker: the sole signal that a deployment directory is ours.

use std::fs;
use std::path::Path;

use dgo_core::{MARKER_CONTENT, MARKER_FILE_NAME};

use crate::error::{io_err, SyncError};

/// Whether `dir` carries the ownership marker at its root.
pub fn is_managed(dir: &Path) -> bool {
    dir.join(MARKER_FILE_NAME).is_file()
}

/// Write (or overwrite) the marker at the root of `dir`.
pub fn write_marker(dir: &Path) -> Result<(), SyncError> {
    let path = dir.join(MARKER_FILE_NAME);
    fs::write(&path, MARKER_CONTENT).map_err(|e| io_err(&path, e))
}
