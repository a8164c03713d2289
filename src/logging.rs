//! Log output for programs embedding this crate.
//!
//! The crate itself only emits `tracing` events. Embedding programs that do
//! not install their own subscriber can call [`init_logging`].

use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_LOG_FILTER, LOG_ENV};
use crate::error::CommandError;

/// Installs a stderr `fmt` subscriber as the global default.
///
/// The filter is `directive` if given, else the `TOOLCMD_LOG` variable, else `warn`.
///
/// # Errors
///
/// `InvalidConfig` if the directive does not parse or a global subscriber is
/// already installed.
pub fn init_logging(directive: Option<&str>) -> Result<(), CommandError> {
    let filter = build_filter(directive)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CommandError::InvalidConfig(format!("cannot install log subscriber: {e}")))
}

fn build_filter(directive: Option<&str>) -> Result<EnvFilter, CommandError> {
    let directive = directive
        .map(str::to_owned)
        .or_else(|| std::env::var(LOG_ENV).ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_owned());
    EnvFilter::try_new(&directive)
        .map_err(|e| CommandError::InvalidConfig(format!("invalid log filter {directive:?}: {e}")))
}
