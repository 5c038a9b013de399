//! Error types for dgo-core.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors raised while resolving [`crate::Settings`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was neither passed as a flag nor set in the environment.
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    /// The polling interval string was empty.
    #[error("polling rate is empty; expected <N><unit> such as 30s, 5m or 1h")]
    EmptyPollingRate,

    /// The numeric part of the polling interval did not parse.
    #[error("invalid polling rate '{input}': '{count}' is not a whole number")]
    InvalidPollingCount { input: String, count: String },

    /// The unit suffix of the polling interval is not one of `s`, `m`, `h`.
    #[error("invalid unit: {0}")]
    InvalidPollingUnit(String),

    /// A zero interval cannot drive the timer.
    #[error("polling rate must be greater than zero, got '{0}'")]
    ZeroPollingRate(String),
}

/// Classification of a failed reconciliation cycle.
///
/// Every error that ends a cycle maps to exactly one kind; the kind alone
/// decides whether the local mirror is wiped before the process exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The repository URL is unparsable. Nothing was touched.
    InvalidUrl,
    /// A clone was requested into a non-empty, non-repository directory.
    DirtyTarget,
    /// Local or remote commit state could not be read.
    RepoState,
    /// Clone or pull failed.
    VcsOperation,
    /// A stack name collides with an unmanaged deployment directory.
    ConflictingStack,
    /// A filesystem operation failed while pruning or projecting stacks.
    Copy,
}

impl FailureKind {
    /// Whether recovery must discard the mirror so the next start clones fresh.
    pub fn wipes_mirror(self) -> bool {
        match self {
            FailureKind::RepoState | FailureKind::VcsOperation | FailureKind::Copy => true,
            FailureKind::InvalidUrl | FailureKind::DirtyTarget | FailureKind::ConflictingStack => {
                false
            }
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::InvalidUrl => "invalid_url",
            FailureKind::DirtyTarget => "dirty_target",
            FailureKind::RepoState => "repo_state",
            FailureKind::VcsOperation => "vcs_operation",
            FailureKind::ConflictingStack => "conflicting_stack",
            FailureKind::Copy => "copy",
        };
        f.write_str(label)
    }
}
