//! Resolved daemon settings and the `<N><unit>` polling-interval parser.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;
use crate::types::{ENV_FILE_PATH, MIRROR_DIR};

/// Polling interval used when none is configured.
pub const DEFAULT_POLLING_RATE: &str = "5m";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'; expected: text, json")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

/// Everything one reconciliation cycle needs, passed explicitly into each run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub repo_url: String,
    /// Personal access token; `None` means unauthenticated.
    pub credential: Option<String>,
    pub polling_interval: Duration,
    /// Externally-managed deployment directory the stacks are projected into.
    pub stacks_dir: PathBuf,
    /// Local mirror of the repository.
    pub repo_dir: PathBuf,
    /// Optional `.env` file copied into every projected stack.
    pub env_file: PathBuf,
}

impl Settings {
    /// Build settings from raw values, applying defaults and validation.
    pub fn resolve(
        repo_url: &str,
        credential: Option<&str>,
        polling_rate: Option<&str>,
        stacks_dir: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let repo_url = repo_url.trim();
        if repo_url.is_empty() {
            return Err(ConfigError::Missing("REPO_URL"));
        }
        let stacks_dir = stacks_dir
            .filter(|dir| !dir.as_os_str().is_empty())
            .ok_or(ConfigError::Missing("DOCKGE_STACKS_DIR"))?;
        let polling_interval = parse_polling_rate(polling_rate.unwrap_or(DEFAULT_POLLING_RATE))?;

        Ok(Self {
            repo_url: repo_url.to_string(),
            credential: normalize_credential(credential),
            polling_interval,
            stacks_dir,
            repo_dir: PathBuf::from(MIRROR_DIR),
            env_file: PathBuf::from(ENV_FILE_PATH),
        })
    }

    pub fn with_repo_dir(mut self, repo_dir: impl Into<PathBuf>) -> Self {
        self.repo_dir = repo_dir.into();
        self
    }

    pub fn with_env_file(mut self, env_file: impl Into<PathBuf>) -> Self {
        self.env_file = env_file.into();
        self
    }
}

fn normalize_credential(credential: Option<&str>) -> Option<String> {
    credential
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Parse a `<N><unit>` polling interval, where unit is `s`, `m` or `h`.
pub fn parse_polling_rate(input: &str) -> Result<Duration, ConfigError> {
    let trimmed = input.trim();
    let Some(unit) = trimmed.chars().last() else {
        return Err(ConfigError::EmptyPollingRate);
    };
    let count = &trimmed[..trimmed.len() - unit.len_utf8()];

    let multiplier = match unit {
        's' => 1,
        'm' => 60,
        'h' => 60 * 60,
        other => return Err(ConfigError::InvalidPollingUnit(other.to_string())),
    };

    let invalid_count = || ConfigError::InvalidPollingCount {
        input: trimmed.to_string(),
        count: count.to_string(),
    };
    // Digits only: `u64::from_str` would also take a leading `+`.
    if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_count());
    }
    let value: u64 = count.parse().map_err(|_| invalid_count())?;
    if value == 0 {
        return Err(ConfigError::ZeroPollingRate(trimmed.to_string()));
    }

    Ok(Duration::from_secs(value.saturating_mul(multiplier)))
}
