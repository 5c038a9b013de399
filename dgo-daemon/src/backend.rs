//! Runtime selection of the [`VcsBackend`] implementation.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use dgo_vcs::{GitCli, VcsBackend};

/// Which VCS backend drives the mirror.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// Shell out to the `git` executable.
    #[default]
    Cli,
    /// Embedded libgit2.
    #[cfg(feature = "libgit2")]
    Libgit2,
}

impl BackendKind {
    pub fn build(self) -> Arc<dyn VcsBackend> {
        match self {
            BackendKind::Cli => Arc::new(GitCli::new()),
            #[cfg(feature = "libgit2")]
            BackendKind::Libgit2 => Arc::new(dgo_vcs::Libgit2::new()),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cli" | "git" => Ok(Self::Cli),
            #[cfg(feature = "libgit2")]
            "libgit2" => Ok(Self::Libgit2),
            #[cfg(not(feature = "libgit2"))]
            "libgit2" => Err("the libgit2 backend is not compiled in; rebuild with --features libgit2".to_string()),
            other => Err(format!("unknown backend '{other}'; expected: cli, libgit2")),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Cli => write!(f, "cli"),
            #[cfg(feature = "libgit2")]
            BackendKind::Libgit2 => write!(f, "libgit2"),
        }
    }
}
