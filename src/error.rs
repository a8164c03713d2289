//! Error types for building and executing tool commands.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors raised while configuring or running a command.
///
/// Every variant is surfaced to the immediate caller; nothing is retried.
/// A non-zero exit status of the child is not an error and never appears here.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The executable path was empty or does not resolve to a runnable file.
    #[error("Invalid executable: {0:?}")]
    InvalidExecutable(String),

    /// The option name is not part of the command's schema.
    #[error("Unsupported option: {0}")]
    UnsupportedOption(String),

    /// A non-boolean value was given to an option that takes no argument.
    #[error("Option {0} takes no argument and only accepts a boolean")]
    InvalidOptionArgument(String),

    /// A list of values was given to an option that may appear only once.
    #[error("Option {0} is not repeatable")]
    NotRepeatable(String),

    /// An option argument, list element or parameter has no text rendering.
    #[error("Value for {context} cannot be rendered as text ({kind})")]
    NonStringableValue {
        /// Where the value was supplied (option name or `parameter`).
        context: String,
        /// Short description of the offending value's type.
        kind: &'static str,
    },

    /// The operating system could not create the child process.
    #[error("Failed to spawn `{command}`: {source}")]
    SpawnFailure {
        /// The rendered command line.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The child did not exit before the configured deadline and was killed.
    #[error("Command `{command}` timed out after {after:?}")]
    TimedOut {
        /// The rendered command line.
        command: String,
        /// The deadline that elapsed.
        after: Duration,
    },

    /// The cancellation token fired while the child was running.
    #[error("Command `{command}` was cancelled")]
    Cancelled {
        /// The rendered command line.
        command: String,
    },

    /// Waiting on or reading from a running child failed.
    #[error("I/O error while running `{command}`: {source}")]
    Io {
        /// The rendered command line.
        command: String,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// An option schema could not be loaded.
    #[error("Invalid option schema: {0}")]
    InvalidSchema(String),

    /// A configuration value could not be interpreted.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A cassette could not be read or written.
    #[error(transparent)]
    Cassette(#[from] CassetteError),
}

impl CommandError {
    /// Stable short name of the variant, used when recording failures.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidExecutable(_) => "invalid_executable",
            Self::UnsupportedOption(_) => "unsupported_option",
            Self::InvalidOptionArgument(_) => "invalid_option_argument",
            Self::NotRepeatable(_) => "not_repeatable",
            Self::NonStringableValue { .. } => "non_stringable_value",
            Self::SpawnFailure { .. } => "spawn",
            Self::TimedOut { .. } => "timeout",
            Self::Cancelled { .. } => "cancelled",
            Self::Io { .. } => "io",
            Self::InvalidSchema(_) => "invalid_schema",
            Self::InvalidConfig(_) => "invalid_config",
            Self::Cassette(_) => "cassette",
        }
    }
}

/// Errors raised while reading or writing cassette files.
#[derive(Debug, Error)]
pub enum CassetteError {
    /// The cassette file could not be read or written.
    #[error("Cassette I/O error for {path}: {source}")]
    Io {
        /// Cassette file path.
        path: PathBuf,
        /// Underlying OS error.
        #[source]
        source: std::io::Error,
    },

    /// The cassette contents are not valid YAML for the cassette format.
    #[error("Failed to parse cassette {path}: {source}")]
    Parse {
        /// Cassette file path.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },

    /// The cassette could not be serialized.
    #[error("Failed to serialize cassette: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// Replay asked for a call the cassette never recorded.
    #[error("Cassette has nothing recorded for {call}; it holds [{recorded}]")]
    NotRecorded {
        /// The `port::method` pair requested.
        call: String,
        /// Comma-separated `port::method` pairs the cassette does hold.
        recorded: String,
    },

    /// Every recorded call of this kind was already replayed.
    #[error("Cassette exhausted: every recorded {call} call was already replayed")]
    Exhausted {
        /// The `port::method` pair requested.
        call: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = CommandError::UnsupportedOption("bogus".into());
        assert_eq!(err.to_string(), "Unsupported option: bogus");

        let err = CommandError::NonStringableValue { context: "exclude".into(), kind: "object" };
        assert!(err.to_string().contains("exclude"));
        assert!(err.to_string().contains("object"));
    }

    #[test]
    fn spawn_failure_keeps_source() {
        let err = CommandError::SpawnFailure {
            command: "nope".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.kind(), "spawn");
    }
}
