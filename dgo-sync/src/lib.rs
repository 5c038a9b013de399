//! # dgo-sync
//!
//! Directory-granular projection of mirror stacks into the deployment
//! directory.
//!
//! Call [`StackReconciler::apply`] after the mirror reached a new commit. It
//! prunes every managed stack, then copies each mirror stack back in and
//! stamps it with the ownership marker. Directories without the marker are
//! never touched.

pub mod copy;
pub mod error;
pub mod marker;
pub mod reconciler;

pub use error::SyncError;
pub use reconciler::{discover_stacks, list_deployed, DeployedDir, StackReconciler};
