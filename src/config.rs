//! Execution settings read from the environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::CommandError;

/// Default deadline for every run, in milliseconds. `0` disables it.
pub const TIMEOUT_ENV: &str = "TOOLCMD_TIMEOUT_MS";
/// Cassette path to record runs into.
pub const RECORD_ENV: &str = "TOOLCMD_RECORD";
/// Cassette path to replay runs from.
pub const REPLAY_ENV: &str = "TOOLCMD_REPLAY";
/// `tracing` filter directive for [`crate::logging::init_logging`].
pub const LOG_ENV: &str = "TOOLCMD_LOG";

/// Filter used when none is configured.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Execution settings shared by the commands of one embedding program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecConfig {
    /// Deadline applied to every run; `None` blocks until the child exits.
    pub timeout: Option<Duration>,
    /// Record runs into this cassette.
    pub record: Option<PathBuf>,
    /// Replay runs from this cassette.
    pub replay: Option<PathBuf>,
    /// `tracing` filter directive.
    pub log_filter: String,
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            record: None,
            replay: None,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl ExecConfig {
    /// Reads settings from the process environment, loading `.env` first if present.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if a variable cannot be interpreted.
    pub fn from_env() -> Result<Self, CommandError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps variable names to values.
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the timeout is not a whole number of milliseconds,
    /// or if both recording and replaying are requested.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CommandError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let timeout = match get(TIMEOUT_ENV) {
            None => None,
            Some(raw) => {
                let millis: u64 = raw.parse().map_err(|_| {
                    CommandError::InvalidConfig(format!(
                        "{TIMEOUT_ENV} must be milliseconds, got {raw:?}"
                    ))
                })?;
                (millis > 0).then(|| Duration::from_millis(millis))
            }
        };

        let config = Self {
            timeout,
            record: get(RECORD_ENV).map(PathBuf::from),
            replay: get(REPLAY_ENV).map(PathBuf::from),
            log_filter: get(LOG_ENV).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned()),
        };
        if config.record.is_some() && config.replay.is_some() {
            return Err(CommandError::InvalidConfig(format!(
                "{RECORD_ENV} and {REPLAY_ENV} cannot both be set"
            )));
        }
        Ok(config)
    }
}
