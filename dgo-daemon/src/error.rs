use std::path::PathBuf;

use thiserror::Error;

use dgo_core::FailureKind;
use dgo_sync::SyncError;
use dgo_vcs::VcsError;

/// Everything that can end a single reconciliation cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("mirror directory {path} is not empty and is not a repository; refusing to clone into it")]
    DirtyTarget { path: PathBuf },

    #[error(transparent)]
    Vcs(#[from] VcsError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CycleError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CycleError::DirtyTarget { .. } => FailureKind::DirtyTarget,
            CycleError::Vcs(err) => err.kind(),
            CycleError::Sync(err) => err.kind(),
            CycleError::Io { .. } => FailureKind::RepoState,
        }
    }
}

/// Error surface for the daemon runtime.
#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reconciliation cycle failed: {0}")]
    Cycle(#[from] CycleError),

    #[error("{kind} failure, and wiping the mirror at {path} also failed: {source}")]
    Recovery {
        kind: FailureKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cycle task did not complete: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl DaemonError {
    /// Classification of the cycle failure behind this error, if any.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            DaemonError::Cycle(err) => Some(err.kind()),
            DaemonError::Recovery { kind, .. } => Some(*kind),
            DaemonError::Io { .. } | DaemonError::Join(_) => None,
        }
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> DaemonError {
    DaemonError::Io {
        path: path.into(),
        source,
    }
}
