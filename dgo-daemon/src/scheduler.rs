//! Fixed-period cycle driver.
//!
//! The first cycle fires immediately, later ones every `period`. A cycle runs
//! to completion on the blocking pool before the next tick is awaited, so
//! cycles never overlap. Shutdown is only observed between cycles.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

use crate::error::DaemonError;

#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    period: Duration,
}

impl Scheduler {
    /// `period` must be non-zero; the settings parser rejects zero intervals.
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Run `cycle` on every tick until shutdown or the first failed cycle.
    ///
    /// Returns the number of completed cycles on shutdown.
    pub async fn run<F>(
        &self,
        mut shutdown_rx: broadcast::Receiver<()>,
        cycle: F,
    ) -> Result<u64, DaemonError>
    where
        F: Fn() -> Result<(), DaemonError> + Send + Sync + 'static,
    {
        let cycle = Arc::new(cycle);
        let mut interval = tokio::time::interval(self.period);
        // A slow cycle pushes the schedule back instead of bursting.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut completed = 0u64;
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    tracing::info!(completed, "shutdown requested, stopping scheduler");
                    break;
                }
                _ = interval.tick() => {
                    let job = Arc::clone(&cycle);
                    tokio::task::spawn_blocking(move || job()).await??;
                    completed += 1;
                    tracing::debug!(completed, next_in_secs = self.period.as_secs(), "waiting for next tick");
                }
            }
        }
        Ok(completed)
    }
}
