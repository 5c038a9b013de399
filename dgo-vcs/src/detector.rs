//! Commit-based change detection against `origin`.

use std::path::Path;

use dgo_core::{CommitId, MirrorHead};

use crate::backend::VcsBackend;
use crate::error::VcsError;

/// Local HEAD next to the freshly fetched remote-tracking tip of the same branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteCheck {
    pub local: MirrorHead,
    pub remote: CommitId,
}

impl RemoteCheck {
    pub fn has_update(&self) -> bool {
        self.local.commit != self.remote
    }
}

/// Read the local head, fetch, and resolve `origin/<current branch>`.
///
/// Any failure along the way is returned; it is never folded into
/// "no update".
pub fn check_remote(backend: &dyn VcsBackend, mirror: &Path) -> Result<RemoteCheck, VcsError> {
    let local = backend.current_commit(mirror)?;
    let remote = backend.remote_commit(mirror, &local.branch)?;
    tracing::debug!(
        branch = %local.branch,
        local = %local.commit.short(),
        remote = %remote.short(),
        "compared local and remote commits",
    );
    Ok(RemoteCheck { local, remote })
}

/// `true` iff the remote-tracking tip differs from the local HEAD commit.
pub fn has_remote_update(backend: &dyn VcsBackend, mirror: &Path) -> Result<bool, VcsError> {
    check_remote(backend, mirror).map(|check| check.has_update())
}
