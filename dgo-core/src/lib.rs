//! dockge-gitops core library: domain types, settings, errors.
//!
//! Public API surface:
//! - [`types`]: newtypes, stack/mirror descriptions, cycle outcomes
//! - [`config`]: [`Settings`] and the polling-interval parser
//! - [`error`]: [`ConfigError`] and the [`FailureKind`] policy table

pub mod config;
pub mod error;
pub mod types;

pub use config::{parse_polling_rate, LogFormat, Settings};
pub use error::{ConfigError, FailureKind};
pub use types::{
    ApplyReport, CommitId, MirrorHead, MirrorState, StackEntry, StackName, SyncOutcome,
    Transition, ENV_FILE_PATH, MARKER_CONTENT, MARKER_FILE_NAME, METADATA_DIR, MIRROR_DIR,
};
