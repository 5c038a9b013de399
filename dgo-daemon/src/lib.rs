//! Reconciliation runtime: mirror state machine, recovery, scheduler.

pub mod backend;
mod error;
pub mod mirror;
pub mod recovery;
mod runtime;
pub mod scheduler;
pub mod status;

pub use backend::BackendKind;
pub use error::{CycleError, DaemonError};
pub use mirror::{inspect, reconcile_mirror};
pub use recovery::recover;
pub use runtime::{init_tracing, run, run_cycle, run_once, start_blocking};
pub use scheduler::Scheduler;
pub use status::{snapshot, StackStatus, StatusSnapshot};
