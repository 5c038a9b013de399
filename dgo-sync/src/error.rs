//! Error types for dgo-sync.

use std::path::PathBuf;

use thiserror::Error;

use dgo_core::{FailureKind, StackName};

/// All errors that can arise while reconciling the deployment directory.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A mirror stack collides with a deployment entry this system does not own.
    #[error("conflicting stack: {name} at {path} is not managed by dockge-gitops")]
    ConflictingStack { name: StackName, path: PathBuf },

    /// A filesystem operation failed, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    pub fn kind(&self) -> FailureKind {
        match self {
            SyncError::ConflictingStack { .. } => FailureKind::ConflictingStack,
            SyncError::Io { .. } => FailureKind::Copy,
        }
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
