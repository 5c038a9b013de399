//! Mirror recovery: discard the clone so the next start sees an absent mirror.

use std::fs;
use std::io;
use std::path::Path;

/// Remove every entry under `mirror`, keeping the directory itself.
///
/// A missing mirror directory counts as already clean. Returns the number of
/// top-level entries removed. The deployment directory is never touched.
pub fn recover(mirror: &Path) -> io::Result<usize> {
    let entries = match fs::read_dir(mirror) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(err),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        removed += 1;
    }

    tracing::warn!(path = %mirror.display(), removed, "wiped mirror contents");
    Ok(removed)
}
