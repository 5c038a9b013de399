//! The VCS capability the reconciliation engine depends on.

use std::path::Path;

use dgo_core::{CommitId, MirrorHead};

use crate::error::VcsError;

/// Operations the mirror needs from a version-control system.
///
/// Implementations must never report success when the underlying state
/// could not be read; every internal failure is an error.
pub trait VcsBackend: Send + Sync {
    /// Clone `url` into the (existing, empty) directory `mirror`.
    fn ensure_mirror(&self, url: &str, mirror: &Path) -> Result<(), VcsError>;

    /// Current branch name and the commit it points at.
    fn current_commit(&self, mirror: &Path) -> Result<MirrorHead, VcsError>;

    /// Fetch `origin` and resolve `refs/remotes/origin/<branch>`.
    ///
    /// A fetch with nothing new is a success.
    fn remote_commit(&self, mirror: &Path, branch: &str) -> Result<CommitId, VcsError>;

    /// Fast-forward `branch` and the working tree from `origin`.
    ///
    /// Being already up to date is a success.
    fn fast_forward(&self, mirror: &Path, branch: &str) -> Result<(), VcsError>;
}

impl<T: VcsBackend + ?Sized> VcsBackend for Box<T> {
    fn ensure_mirror(&self, url: &str, mirror: &Path) -> Result<(), VcsError> {
        (**self).ensure_mirror(url, mirror)
    }

    fn current_commit(&self, mirror: &Path) -> Result<MirrorHead, VcsError> {
        (**self).current_commit(mirror)
    }

    fn remote_commit(&self, mirror: &Path, branch: &str) -> Result<CommitId, VcsError> {
        (**self).remote_commit(mirror, branch)
    }

    fn fast_forward(&self, mirror: &Path, branch: &str) -> Result<(), VcsError> {
        (**self).fast_forward(mirror, branch)
    }
}
