//! dockge-gitops: keep a Dockge stacks directory in step with a git repository.
//!
//! # Usage
//!
//! ```text
//! dockge-gitops [run]            poll the repository forever
//! dockge-gitops once             run a single reconciliation cycle
//! dockge-gitops status [--json]  show the mirror and every deployed stack
//! dockge-gitops clean            wipe the local mirror
//! ```
//!
//! Settings come from `REPO_URL`, `PAT`, `POLLING_RATE` and
//! `DOCKGE_STACKS_DIR` (plus a few optional ones); flags override them.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{status::StatusArgs, GlobalArgs};

#[derive(Parser, Debug)]
#[command(
    name = "dockge-gitops",
    version,
    about = "Sync Dockge stacks from a git repository",
    long_about = None,
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile on the polling interval until interrupted (default).
    Run,

    /// Run exactly one reconciliation cycle and exit.
    Once,

    /// Show the mirror state and the ownership of every deployed stack.
    Status(StatusArgs),

    /// Remove the local mirror's contents so the next cycle clones fresh.
    Clean,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::run(&cli.global),
        Commands::Once => commands::run::once(&cli.global),
        Commands::Status(args) => args.run(&cli.global),
        Commands::Clean => commands::clean::run(&cli.global),
    }
}
