//! `dockge-gitops clean`: manual mirror recovery.

use anyhow::{Context, Result};

use dgo_daemon::recover;

use super::GlobalArgs;

pub fn run(global: &GlobalArgs) -> Result<()> {
    let mirror = &global.repo_dir;
    let removed = recover(mirror)
        .with_context(|| format!("failed to wipe mirror at {}", mirror.display()))?;
    println!("removed {removed} entries from {}", mirror.display());
    Ok(())
}
