//! Recursive, mode-preserving directory copy.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{io_err, SyncError};

/// Copy the tree at `source` to `destination`.
///
/// File and directory modes are preserved, symlinks are recreated as
/// symlinks (unix). Returns the number of regular files copied.
pub fn copy_dir_all(source: &Path, destination: &Path) -> Result<usize, SyncError> {
    let mut files = 0usize;
    // Directory modes are applied last so read-only sources can still be filled.
    let mut dir_modes: Vec<(PathBuf, fs::Permissions)> = Vec::new();

    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(source).to_path_buf();
            io_err(path, io::Error::from(err))
        })?;
        let relative = entry.path().strip_prefix(source).map_err(|_| {
            io_err(
                entry.path(),
                io::Error::new(io::ErrorKind::InvalidInput, "entry outside copy root"),
            )
        })?;
        let target = destination.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target).map_err(|e| io_err(&target, e))?;
            let meta = entry.metadata().map_err(|err| {
                io_err(entry.path(), io::Error::from(err))
            })?;
            dir_modes.push((target, meta.permissions()));
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| io_err(&target, e))?;
            files += 1;
        }
    }

    for (dir, perms) in dir_modes.into_iter().rev() {
        fs::set_permissions(&dir, perms).map_err(|e| io_err(&dir, e))?;
    }

    tracing::debug!(
        source = %source.display(),
        destination = %destination.display(),
        files,
        "copied directory tree",
    );
    Ok(files)
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> Result<(), SyncError> {
    let link = fs::read_link(source).map_err(|e| io_err(source, e))?;
    std::os::unix::fs::symlink(&link, target).map_err(|e| io_err(target, e))
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, target: &Path) -> Result<(), SyncError> {
    fs::copy(source, target)
        .map(|_| ())
        .map_err(|e| io_err(target, e))
}
