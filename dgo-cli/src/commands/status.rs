//! `dockge-gitops status`: mirror state and stack ownership.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use dgo_daemon::{snapshot, StackStatus, StatusSnapshot};

use super::GlobalArgs;

/// Arguments for `dockge-gitops status`.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Emit machine-readable JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Tabled)]
struct StackRow {
    #[tabled(rename = "stack")]
    stack: String,
    #[tabled(rename = "ownership")]
    ownership: String,
    #[tabled(rename = "in repo")]
    in_source: String,
    #[tabled(rename = "note")]
    note: String,
}

impl StatusArgs {
    pub fn run(self, global: &GlobalArgs) -> Result<()> {
        let settings = global.settings()?;
        let backend = global.backend.build();
        let snap = snapshot(backend.as_ref(), &settings).context("failed to collect status")?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&snap).context("failed to serialize status JSON")?
            );
            return Ok(());
        }

        print_table(&snap);
        Ok(())
    }
}

fn print_table(snap: &StatusSnapshot) {
    match &snap.mirror.head {
        Some(head) => println!(
            "mirror {} | {} @ {} | {}",
            snap.mirror.path.display(),
            head.branch.bold(),
            head.commit.short(),
            snap.mirror.remote_url,
        ),
        None => println!(
            "mirror {} | {} | {}",
            snap.mirror.path.display(),
            "absent".yellow().bold(),
            snap.mirror.remote_url,
        ),
    }
    println!("stacks {}", snap.stacks_dir.display());

    if snap.stacks.is_empty() {
        println!("No stacks deployed.");
        return;
    }

    let rows: Vec<StackRow> = snap.stacks.iter().map(row).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    let conflicts = snap.conflicts().count();
    if conflicts > 0 {
        println!(
            "{} {conflicts} unmanaged directories collide with repository stacks; the next apply will fail.",
            "!".red().bold(),
        );
    }
}

fn row(stack: &StackStatus) -> StackRow {
    let ownership = if stack.managed {
        "managed".green().to_string()
    } else {
        "unmanaged".bright_black().to_string()
    };
    let note = match (stack.managed, stack.in_source) {
        (false, true) => "conflict".red().bold().to_string(),
        (true, false) => "pruned on next apply".yellow().to_string(),
        _ => String::new(),
    };
    StackRow {
        stack: stack.name.to_string(),
        ownership,
        in_source: if stack.in_source { "yes" } else { "no" }.to_string(),
        note,
    }
}
