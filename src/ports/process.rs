//! Process runner port: the boundary where a rendered command line becomes a child process.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// Sentinel exit code reported before a run completes or when no code exists.
pub const EXIT_NOT_OK: i32 = -1;

/// A request to run one rendered command line.
#[derive(Debug, Clone)]
pub struct ProcessRequest {
    /// The full command line, handed whole to the shell.
    pub command_line: String,
    /// Directory the child starts in.
    pub working_dir: PathBuf,
    /// Kill the child and fail with `TimedOut` once this elapses.
    pub timeout: Option<Duration>,
    /// Kill the child and fail with `Cancelled` once this fires.
    pub cancel: Option<CancelToken>,
}

impl ProcessRequest {
    /// A request with no deadline and no cancellation.
    pub fn new(command_line: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            command_line: command_line.into(),
            working_dir: working_dir.into(),
            timeout: None,
            cancel: None,
        }
    }
}

/// Captured result of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutput {
    /// Exit status; `128 + signal` for signal-terminated children on Unix.
    pub exit_code: i32,
    /// Everything written to standard output, untrimmed.
    pub stdout: String,
    /// Everything written to standard error, untrimmed.
    pub stderr: String,
}

/// Runs command lines as child processes.
///
/// Implementations block until the child exits or the request's deadline or
/// cancellation fires. A non-zero exit status is a successful run.
pub trait ProcessRunner: Send + Sync {
    /// Runs the request and returns the child's output.
    ///
    /// # Errors
    ///
    /// `SpawnFailure` if the child cannot be created, `TimedOut` or
    /// `Cancelled` if it was killed, `Io` if its output could not be collected.
    fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput, CommandError>;
}

/// Cooperative cancellation shared between a caller and a running command.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// A token that has not fired.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires the token. Every clone observes it.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Whether the token has fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_visible_to_clones() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_cancelled());
        token.cancel();
        assert!(observer.is_cancelled());
    }
}
