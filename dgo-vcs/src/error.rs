//! Error types for dgo-vcs.

use std::path::PathBuf;

use thiserror::Error;

use dgo_core::FailureKind;

/// All errors that can arise from VCS operations.
///
/// Messages never contain the credential: URLs and command output are
/// scrubbed before they are stored here.
#[derive(Debug, Error)]
pub enum VcsError {
    /// The repository URL could not be parsed or cannot carry a credential.
    #[error("error parsing url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Local HEAD, the fetch, or the remote-tracking reference could not be resolved.
    #[error("error reading repository state at {path} ({step}): {message}")]
    RepoState {
        path: PathBuf,
        step: &'static str,
        message: String,
    },

    /// Clone or pull failed.
    #[error("error {operation} repository at {path}: {message}")]
    Operation {
        path: PathBuf,
        operation: &'static str,
        message: String,
    },
}

impl VcsError {
    pub fn kind(&self) -> FailureKind {
        match self {
            VcsError::InvalidUrl { .. } => FailureKind::InvalidUrl,
            VcsError::RepoState { .. } => FailureKind::RepoState,
            VcsError::Operation { .. } => FailureKind::VcsOperation,
        }
    }
}

/// Convenience constructor for [`VcsError::RepoState`].
pub(crate) fn state_err(
    path: impl Into<PathBuf>,
    step: &'static str,
    message: impl Into<String>,
) -> VcsError {
    VcsError::RepoState {
        path: path.into(),
        step,
        message: message.into(),
    }
}

/// Convenience constructor for [`VcsError::Operation`].
pub(crate) fn op_err(
    path: impl Into<PathBuf>,
    operation: &'static str,
    message: impl Into<String>,
) -> VcsError {
    VcsError::Operation {
        path: path.into(),
        operation,
        message: message.into(),
    }
}
