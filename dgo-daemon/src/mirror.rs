//! RepoMirror: the clone-or-pull state machine run once per cycle.
//!
//! ```text
//! Absent ──(dir empty)──► Cloning ──► Synced ──► apply
//!   │                                   ▲
//!   └─(dir not empty)─► DirtyTarget     │
//! Present ──► check_remote ──(same)──► UpToDate
//!                  └──────(differs)──► Pulling
//! ```
//!
//! Errors are returned, never retried; the caller decides about recovery.

use std::fs;
use std::io;
use std::path::Path;

use dgo_core::{MirrorState, Settings, SyncOutcome, Transition, METADATA_DIR};
use dgo_sync::StackReconciler;
use dgo_vcs::{check_remote, credential_url, redact_url, VcsBackend, VcsError};

use crate::error::CycleError;

/// Whether `mirror` holds repository metadata.
pub fn is_present(mirror: &Path) -> bool {
    mirror.join(METADATA_DIR).exists()
}

/// Bring the mirror up to date with the remote and project its stacks.
///
/// The URL is validated (and the credential embedded) before anything else
/// happens. The reconciler runs only after a clone or a pull.
pub fn reconcile_mirror(
    backend: &dyn VcsBackend,
    settings: &Settings,
) -> Result<SyncOutcome, CycleError> {
    let url = credential_url(&settings.repo_url, settings.credential.as_deref())?;
    let mirror = settings.repo_dir.as_path();
    let reconciler = StackReconciler::new(&settings.env_file);

    let transition = if is_present(mirror) {
        let check = check_remote(backend, mirror)?;
        if !check.has_update() {
            tracing::info!(
                branch = %check.local.branch,
                commit = %check.local.commit.short(),
                "repo is up to date",
            );
            return Ok(SyncOutcome::UpToDate);
        }

        tracing::info!(
            branch = %check.local.branch,
            local = %check.local.commit.short(),
            remote = %check.remote.short(),
            "repo is not up to date, pulling",
        );
        backend.fast_forward(mirror, &check.local.branch)?;
        tracing::info!(commit = %check.remote.short(), "repo pulled");
        Transition::Pulled
    } else {
        ensure_empty(mirror)?;
        tracing::info!(
            url = %redact_url(&settings.repo_url),
            path = %mirror.display(),
            "repo does not exist, cloning",
        );
        backend.ensure_mirror(&url, mirror)?;
        tracing::info!(path = %mirror.display(), "repo cloned");
        Transition::Cloned
    };

    let report = reconciler.apply(mirror, &settings.stacks_dir)?;
    Ok(SyncOutcome::Applied { transition, report })
}

/// Describe the mirror without touching the remote.
pub fn inspect(backend: &dyn VcsBackend, settings: &Settings) -> Result<MirrorState, VcsError> {
    let mirror = settings.repo_dir.as_path();
    let head = if is_present(mirror) {
        Some(backend.current_commit(mirror)?)
    } else {
        None
    };
    Ok(MirrorState {
        path: mirror.to_path_buf(),
        remote_url: redact_url(&settings.repo_url),
        head,
    })
}

/// A clone may only land in a missing or empty directory.
fn ensure_empty(mirror: &Path) -> Result<(), CycleError> {
    let mut entries = match fs::read_dir(mirror) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(source) => {
            return Err(CycleError::Io {
                path: mirror.to_path_buf(),
                source,
            })
        }
    };
    if entries.next().is_some() {
        return Err(CycleError::DirtyTarget {
            path: mirror.to_path_buf(),
        });
    }
    Ok(())
}
