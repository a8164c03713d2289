//! Replaying adapter for the `ProcessRunner` port.

use std::io;
use std::sync::{Mutex, PoisonError};

use serde_json::Value;
use tracing::warn;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::CommandError;
use crate::ports::process::{ProcessOutput, ProcessRequest, ProcessRunner, EXIT_NOT_OK};

/// Serves recorded runs instead of spawning processes.
pub struct ReplayingProcessRunner {
    replayer: Mutex<CassetteReplayer>,
}

impl ReplayingProcessRunner {
    /// A runner that answers from `replayer`.
    #[must_use]
    pub fn new(replayer: CassetteReplayer) -> Self {
        Self { replayer: Mutex::new(replayer) }
    }
}

impl ProcessRunner for ReplayingProcessRunner {
    fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput, CommandError> {
        let interaction = self
            .replayer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next_interaction("process", "run")?;

        let recorded = interaction.input.get("command_line").and_then(Value::as_str);
        if recorded.is_some_and(|line| line != request.command_line) {
            warn!(
                seq = interaction.seq,
                recorded = recorded.unwrap_or_default(),
                requested = %request.command_line,
                "replayed command line differs from the recording"
            );
        }

        let output = interaction.output;
        if let Some(err) = output.get("err") {
            return Err(replayed_error(err, request));
        }
        let value = output.get("ok").unwrap_or(&output);
        let exit_code = value
            .get("exit_code")
            .and_then(Value::as_i64)
            .and_then(|code| i32::try_from(code).ok())
            .unwrap_or(EXIT_NOT_OK);
        let text = |field: &str| value.get(field).and_then(Value::as_str).unwrap_or("").to_owned();

        Ok(ProcessOutput { exit_code, stdout: text("stdout"), stderr: text("stderr") })
    }
}

fn replayed_error(err: &Value, request: &ProcessRequest) -> CommandError {
    let command = request.command_line.clone();
    let message = err
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| err.as_str())
        .unwrap_or("unknown error")
        .to_owned();

    match err.get("kind").and_then(Value::as_str) {
        Some("spawn") => CommandError::SpawnFailure { command, source: io::Error::other(message) },
        Some("timeout") => {
            CommandError::TimedOut { command, after: request.timeout.unwrap_or_default() }
        }
        Some("cancelled") => CommandError::Cancelled { command },
        _ => CommandError::Io { command, source: io::Error::other(message) },
    }
}
