//! Point-in-time view of the mirror and the deployment directory.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

use dgo_core::{MirrorState, Settings, StackName};
use dgo_sync::{discover_stacks, list_deployed};
use dgo_vcs::VcsBackend;

use crate::error::{CycleError, DaemonError};
use crate::mirror::inspect;

/// One directory under the deployment root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackStatus {
    pub name: StackName,
    /// Carries the ownership marker.
    pub managed: bool,
    /// A stack of the same name exists in the mirror.
    pub in_source: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub mirror: MirrorState,
    pub stacks_dir: PathBuf,
    pub stacks: Vec<StackStatus>,
}

impl StatusSnapshot {
    /// Unmanaged directories that share a name with a mirror stack.
    pub fn conflicts(&self) -> impl Iterator<Item = &StackStatus> {
        self.stacks.iter().filter(|s| !s.managed && s.in_source)
    }
}

/// Collect a snapshot without fetching or mutating anything.
pub fn snapshot(backend: &dyn VcsBackend, settings: &Settings) -> Result<StatusSnapshot, DaemonError> {
    let mirror = inspect(backend, settings).map_err(CycleError::from)?;

    let source: BTreeSet<StackName> = if mirror.is_present() {
        discover_stacks(&settings.repo_dir, &settings.stacks_dir)
            .map_err(CycleError::from)?
            .into_iter()
            .map(|stack| stack.name)
            .collect()
    } else {
        BTreeSet::new()
    };

    let stacks = if settings.stacks_dir.is_dir() {
        list_deployed(&settings.stacks_dir)
            .map_err(CycleError::from)?
            .into_iter()
            .map(|dir| StackStatus {
                in_source: source.contains(&dir.name),
                name: dir.name,
                managed: dir.managed,
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(StatusSnapshot {
        mirror,
        stacks_dir: settings.stacks_dir.clone(),
        stacks,
    })
}
