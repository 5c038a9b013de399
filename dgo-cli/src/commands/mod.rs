pub mod clean;
pub mod run;
pub mod status;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use dgo_core::{LogFormat, Settings, ENV_FILE_PATH, MIRROR_DIR};
use dgo_daemon::BackendKind;

/// Settings shared by every subcommand; each flag falls back to its env var.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Repository to mirror.
    #[arg(long, env = "REPO_URL", global = true)]
    pub repo_url: Option<String>,

    /// Personal access token embedded into the clone URL.
    #[arg(long, env = "PAT", global = true, hide_env_values = true)]
    pub pat: Option<String>,

    /// Polling interval such as 30s, 5m or 1h [default: 5m].
    #[arg(long, env = "POLLING_RATE", global = true)]
    pub polling_rate: Option<String>,

    /// Dockge stacks directory the stacks are projected into.
    #[arg(long, env = "DOCKGE_STACKS_DIR", global = true)]
    pub stacks_dir: Option<PathBuf>,

    /// Local mirror of the repository.
    #[arg(long, env = "REPO_DIR", global = true, default_value = MIRROR_DIR)]
    pub repo_dir: PathBuf,

    /// Optional .env file copied into every stack.
    #[arg(long, env = "ENV_FILE", global = true, default_value = ENV_FILE_PATH)]
    pub env_file: PathBuf,

    /// Log output: text or json.
    #[arg(long, env = "LOG_FORMAT", global = true, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// VCS backend: cli, or libgit2 when built with that feature.
    #[arg(long, env = "VCS_BACKEND", global = true, default_value_t = BackendKind::Cli)]
    pub backend: BackendKind,
}

impl GlobalArgs {
    pub fn settings(&self) -> Result<Settings> {
        let settings = Settings::resolve(
            self.repo_url.as_deref().unwrap_or_default(),
            self.pat.as_deref(),
            self.polling_rate.as_deref(),
            self.stacks_dir.clone(),
        )
        .context("invalid configuration")?;
        Ok(settings
            .with_repo_dir(&self.repo_dir)
            .with_env_file(&self.env_file))
    }
}
