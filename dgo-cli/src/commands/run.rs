//! `dockge-gitops run` and `dockge-gitops once`.

use anyhow::{Context, Result};
use colored::Colorize;

use dgo_core::SyncOutcome;
use dgo_daemon::{init_tracing, run_once, start_blocking};

use super::GlobalArgs;

pub fn run(global: &GlobalArgs) -> Result<()> {
    let settings = global.settings()?;
    start_blocking(settings, global.backend.build(), global.log_format)
        .context("dockge-gitops exited with error")
}

pub fn once(global: &GlobalArgs) -> Result<()> {
    let settings = global.settings()?;
    init_tracing(global.log_format);
    let backend = global.backend.build();

    let outcome =
        run_once(backend.as_ref(), &settings).context("reconciliation cycle failed")?;
    match outcome {
        SyncOutcome::UpToDate => println!("{} repo is up to date", "✓".green().bold()),
        SyncOutcome::Applied { transition, report } => {
            println!(
                "{} repo {transition}: {} stacks projected, {} pruned{}",
                "✓".green().bold(),
                report.projected.len(),
                report.pruned.len(),
                if report.env_file_copied { ", .env copied" } else { "" },
            );
        }
    }
    Ok(())
}
