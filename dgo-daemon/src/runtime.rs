use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;

use dgo_core::{LogFormat, Settings, SyncOutcome};
use dgo_vcs::{redact_url, VcsBackend};

use crate::error::{io_err, DaemonError};
use crate::mirror::reconcile_mirror;
use crate::recovery::recover;
use crate::scheduler::Scheduler;

/// Run one reconciliation cycle behind the failure boundary.
///
/// On failure the mirror is wiped when the failure kind demands it, and the
/// error is returned so the caller can exit.
pub fn run_cycle(backend: &dyn VcsBackend, settings: &Settings) -> Result<SyncOutcome, DaemonError> {
    let started = Instant::now();
    match reconcile_mirror(backend, settings) {
        Ok(outcome) => {
            if let SyncOutcome::Applied { transition, report } = &outcome {
                tracing::info!(
                    %transition,
                    projected = report.projected.len(),
                    pruned = report.pruned.len(),
                    env_file_copied = report.env_file_copied,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "reconciliation cycle applied",
                );
            }
            Ok(outcome)
        }
        Err(err) => {
            let kind = err.kind();
            tracing::error!(%kind, error = %err, "reconciliation cycle failed");
            if kind.wipes_mirror() {
                let mirror = &settings.repo_dir;
                recover(mirror).map_err(|source| DaemonError::Recovery {
                    kind,
                    path: mirror.clone(),
                    source,
                })?;
            }
            Err(DaemonError::Cycle(err))
        }
    }
}

/// Create the mirror directory if missing and run a single cycle.
pub fn run_once(backend: &dyn VcsBackend, settings: &Settings) -> Result<SyncOutcome, DaemonError> {
    ensure_mirror_dir(&settings.repo_dir)?;
    run_cycle(backend, settings)
}

/// Start the daemon runtime and block the current thread until it exits.
pub fn start_blocking(
    settings: Settings,
    backend: Arc<dyn VcsBackend>,
    log_format: LogFormat,
) -> Result<(), DaemonError> {
    init_tracing(log_format);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| io_err("tokio-runtime", e))?;
    runtime.block_on(run(settings, backend))
}

/// Run cycles on the polling interval until Ctrl-C or the first failure.
pub async fn run(settings: Settings, backend: Arc<dyn VcsBackend>) -> Result<(), DaemonError> {
    ensure_mirror_dir(&settings.repo_dir)?;
    tracing::info!(
        repo = %redact_url(&settings.repo_url),
        mirror = %settings.repo_dir.display(),
        stacks = %settings.stacks_dir.display(),
        interval_secs = settings.polling_interval.as_secs(),
        "starting dockge-gitops",
    );

    let (shutdown_tx, _) = broadcast::channel::<()>(4);

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("received ctrl-c, finishing current cycle");
                    let _ = shutdown.send(());
                }
                Err(err) => tracing::error!(error = %err, "ctrl-c handler failed"),
            }
        })
    };

    let scheduler = Scheduler::new(settings.polling_interval);
    let settings = Arc::new(settings);
    let result = scheduler
        .run(shutdown_tx.subscribe(), move || {
            run_cycle(backend.as_ref(), &settings).map(|_| ())
        })
        .await;

    signal_handle.abort();
    let completed = result?;
    tracing::info!(completed, "daemon stopped");
    Ok(())
}

fn ensure_mirror_dir(mirror: &Path) -> Result<(), DaemonError> {
    if !mirror.exists() {
        fs::create_dir_all(mirror).map_err(|e| io_err(mirror, e))?;
    }
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing(format: LogFormat) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = match format {
        LogFormat::Text => fmt().with_env_filter(filter).with_target(false).try_init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .try_init(),
    };
}
