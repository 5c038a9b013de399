//! Two-phase stack reconciliation: prune managed stacks, then project.
//!
//! ## Conflict check
//!
//! Before anything is removed, every mirror stack whose destination exists
//! without the ownership marker is reported as a
//! [`SyncError::ConflictingStack`]. A conflict leaves the deployment
//! directory exactly as it was.
//!
//! ## Prune
//!
//! Every immediate child of the deployment directory that carries the
//! ownership marker is deleted. Anything else is left alone.
//!
//! ## Project
//!
//! For each top-level mirror directory `S` (the metadata dir excluded):
//!
//! 1. If `deploy/S` still exists it appeared after the conflict check, which
//!    is also a [`SyncError::ConflictingStack`].
//! 2. Copy `mirror/S` to `deploy/S`, preserving modes.
//! 3. Write the ownership marker.
//! 4. Copy the external `.env` file in, when it exists.
//!
//! The first failure aborts the apply; copies that already landed stay.

use std::fs;
use std::path::{Path, PathBuf};

use dgo_core::{ApplyReport, StackEntry, StackName, ENV_FILE_PATH, METADATA_DIR};

use crate::copy::copy_dir_all;
use crate::error::{io_err, SyncError};
use crate::marker::{is_managed, write_marker};

/// File name the external env file gets inside every projected stack.
const STACK_ENV_FILE: &str = ".env";

/// One immediate child directory of the deployment directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedDir {
    pub name: StackName,
    pub path: PathBuf,
    pub managed: bool,
}

/// Projects mirror stacks into a deployment directory.
#[derive(Debug, Clone)]
pub struct StackReconciler {
    env_file: PathBuf,
}

impl Default for StackReconciler {
    fn default() -> Self {
        Self::new(ENV_FILE_PATH)
    }
}

impl StackReconciler {
    pub fn new(env_file: impl Into<PathBuf>) -> Self {
        Self {
            env_file: env_file.into(),
        }
    }

    /// Prune, then project. Call only after a successful clone or pull.
    pub fn apply(&self, mirror: &Path, deploy: &Path) -> Result<ApplyReport, SyncError> {
        tracing::info!(
            mirror = %mirror.display(),
            deploy = %deploy.display(),
            "copying stacks",
        );

        let stacks = discover_stacks(mirror, deploy)?;
        check_conflicts(&stacks)?;
        let pruned = prune_managed(deploy)?;

        // Best-effort augmentation; absence is not an error.
        let env_file = self.env_file.is_file().then_some(self.env_file.as_path());

        let mut projected = Vec::with_capacity(stacks.len());
        for stack in &stacks {
            project_stack(stack, env_file)?;
            projected.push(stack.name.clone());
        }

        tracing::info!(
            projected = projected.len(),
            pruned = pruned.len(),
            env_file = env_file.is_some(),
            "stacks copied",
        );
        Ok(ApplyReport {
            pruned,
            projected,
            env_file_copied: env_file.is_some() && !stacks.is_empty(),
        })
    }
}

/// Top-level mirror directories, sorted by name, excluding the metadata dir.
pub fn discover_stacks(mirror: &Path, deploy: &Path) -> Result<Vec<StackEntry>, SyncError> {
    let mut stacks = Vec::new();
    for entry in fs::read_dir(mirror).map_err(|e| io_err(mirror, e))? {
        let entry = entry.map_err(|e| io_err(mirror, e))?;
        let file_type = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name == METADATA_DIR {
            continue;
        }
        stacks.push(StackEntry::new(StackName::from(name), mirror, deploy));
    }
    stacks.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(stacks)
}

/// Immediate child directories of the deployment dir, with ownership.
pub fn list_deployed(deploy: &Path) -> Result<Vec<DeployedDir>, SyncError> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(deploy).map_err(|e| io_err(deploy, e))? {
        let entry = entry.map_err(|e| io_err(deploy, e))?;
        let file_type = entry.file_type().map_err(|e| io_err(entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }
        let path = entry.path();
        dirs.push(DeployedDir {
            name: StackName::from(entry.file_name().to_string_lossy().into_owned()),
            managed: is_managed(&path),
            path,
        });
    }
    dirs.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(dirs)
}

/// Fail on the first stack whose destination exists and would survive pruning.
fn check_conflicts(stacks: &[StackEntry]) -> Result<(), SyncError> {
    for stack in stacks {
        let Ok(meta) = fs::symlink_metadata(&stack.destination) else {
            continue;
        };
        if meta.is_dir() && is_managed(&stack.destination) {
            continue;
        }
        return Err(SyncError::ConflictingStack {
            name: stack.name.clone(),
            path: stack.destination.clone(),
        });
    }
    Ok(())
}

/// Delete every marker-bearing child of `deploy`.
fn prune_managed(deploy: &Path) -> Result<Vec<StackName>, SyncError> {
    let mut pruned = Vec::new();
    for dir in list_deployed(deploy)? {
        if !dir.managed {
            tracing::debug!(stack = %dir.name, "leaving unmanaged directory alone");
            continue;
        }
        fs::remove_dir_all(&dir.path).map_err(|e| io_err(&dir.path, e))?;
        tracing::debug!(stack = %dir.name, "pruned managed stack");
        pruned.push(dir.name);
    }
    Ok(pruned)
}

/// Project a single stack.
fn project_stack(stack: &StackEntry, env_file: Option<&Path>) -> Result<(), SyncError> {
    if fs::symlink_metadata(&stack.destination).is_ok() {
        return Err(SyncError::ConflictingStack {
            name: stack.name.clone(),
            path: stack.destination.clone(),
        });
    }

    copy_dir_all(&stack.source, &stack.destination)?;
    write_marker(&stack.destination)?;

    if let Some(env_file) = env_file {
        let target = stack.destination.join(STACK_ENV_FILE);
        fs::copy(env_file, &target).map_err(|e| io_err(&target, e))?;
    }

    tracing::debug!(stack = %stack.name, "projected stack");
    Ok(())
}
