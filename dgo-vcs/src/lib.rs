//! # dgo-vcs
//!
//! Version-control capability used by the reconciliation engine.
//!
//! The engine only sees [`VcsBackend`]. [`GitCli`] drives the `git`
//! executable through a [`CommandExecutor`]; with the `libgit2` feature,
//! `Libgit2` satisfies the same trait with an embedded library.
//! [`check_remote`] / [`has_remote_update`] implement change detection on top
//! of either backend.

pub mod backend;
pub mod credential;
pub mod detector;
pub mod error;
pub mod executor;
pub mod git_cli;
#[cfg(feature = "libgit2")]
pub mod libgit2;

pub use backend::VcsBackend;
pub use credential::{credential_url, redact_url};
pub use detector::{check_remote, has_remote_update, RemoteCheck};
pub use error::VcsError;
pub use executor::{CommandExecutor, CommandOutput, CommandRequest, ProcessExecutor};
pub use git_cli::GitCli;
#[cfg(feature = "libgit2")]
pub use libgit2::Libgit2;
