//! Domain types shared by the mirror, the reconciler and the daemon.
//!
//! All path fields use `PathBuf`; never `&str` or `String` for filesystem paths.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

// ---------------------------------------------------------------------------
// Fixed layout contracts
// ---------------------------------------------------------------------------

/// Repository metadata directory inside the mirror. Never treated as a stack.
pub const METADATA_DIR: &str = ".git";

/// Ownership marker written into every stack directory this system creates.
pub const MARKER_FILE_NAME: &str = ".dgo";

/// Fixed provenance string stored in the ownership marker.
pub const MARKER_CONTENT: &str =
    "Managed by dockge-gitops https://github.com/ebaldebo/dockge-gitops";

/// Well-known location of the optional `.env` file copied into every stack.
pub const ENV_FILE_PATH: &str = "/env/.env";

/// Default location of the local mirror.
pub const MIRROR_DIR: &str = "/tmp/repo";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Name of a stack: one top-level directory of the mirror.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct StackName(pub String);

impl fmt::Display for StackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for StackName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for StackName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Hex object id of a commit, as reported by the VCS backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CommitId(pub String);

impl CommitId {
    /// Abbreviated form for log lines.
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(12)
            .map(|(idx, _)| idx)
            .unwrap_or(self.0.len());
        &self.0[..end]
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CommitId {
    fn from(s: String) -> Self {
        Self(s.trim().to_owned())
    }
}

impl From<&str> for CommitId {
    fn from(s: &str) -> Self {
        Self(s.trim().to_owned())
    }
}

// ---------------------------------------------------------------------------
// Mirror
// ---------------------------------------------------------------------------

/// Current branch and commit of a fully-formed clone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorHead {
    pub branch: String,
    pub commit: CommitId,
}

/// Snapshot of the local clone.
///
/// A mirror is either absent (no metadata directory) or a clone with a
/// resolvable HEAD; `head` is `None` only in the former case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MirrorState {
    pub path: PathBuf,
    /// Remote URL with any credential redacted.
    pub remote_url: String,
    pub head: Option<MirrorHead>,
}

impl MirrorState {
    pub fn is_present(&self) -> bool {
        self.head.is_some()
    }
}

// ---------------------------------------------------------------------------
// Stacks
// ---------------------------------------------------------------------------

/// One deployable unit: a top-level mirror directory and where it lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackEntry {
    pub name: StackName,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl StackEntry {
    pub fn new(name: StackName, mirror: &Path, deploy: &Path) -> Self {
        Self {
            source: mirror.join(&name.0),
            destination: deploy.join(&name.0),
            name,
        }
    }

    /// Path of the ownership marker inside the destination root.
    pub fn marker_path(&self) -> PathBuf {
        self.destination.join(MARKER_FILE_NAME)
    }
}

// ---------------------------------------------------------------------------
// Cycle results
// ---------------------------------------------------------------------------

/// What the reconciler did to the deployment directory in one apply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyReport {
    /// Managed stacks removed during the prune phase.
    pub pruned: Vec<StackName>,
    /// Stacks copied from the mirror during the project phase.
    pub projected: Vec<StackName>,
    /// Whether the external `.env` file was copied into the projected stacks.
    pub env_file_copied: bool,
}

/// How the mirror reached its synced state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Transition {
    Cloned,
    Pulled,
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Cloned => write!(f, "cloned"),
            Transition::Pulled => write!(f, "pulled"),
        }
    }
}

/// Result of one successful reconciliation cycle.
///
/// Failed cycles are reported as errors whose classification is a
/// [`crate::FailureKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// No remote change; nothing under the deployment directory was touched.
    UpToDate,
    /// The mirror advanced and the stacks were re-projected.
    Applied {
        transition: Transition,
        report: ApplyReport,
    },
}

impl SyncOutcome {
    pub fn is_noop(&self) -> bool {
        matches!(self, SyncOutcome::UpToDate)
    }
}
