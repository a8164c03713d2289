//! Recording adapter for the `ProcessRunner` port.

use std::path::Path;

use serde::Serialize;

use super::{record_result, SharedRecorder};
use crate::error::CommandError;
use crate::ports::process::{ProcessOutput, ProcessRequest, ProcessRunner};

/// Records every run while delegating to an inner runner.
pub struct RecordingProcessRunner {
    inner: Box<dyn ProcessRunner>,
    recorder: SharedRecorder,
}

impl RecordingProcessRunner {
    /// Wraps `inner`, appending each run to `recorder`.
    pub fn new(inner: Box<dyn ProcessRunner>, recorder: SharedRecorder) -> Self {
        Self { inner, recorder }
    }
}

#[derive(Serialize)]
struct RunInput<'a> {
    command_line: &'a str,
    working_dir: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u128>,
}

impl ProcessRunner for RecordingProcessRunner {
    fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput, CommandError> {
        let result = self.inner.run(request);
        let input = RunInput {
            command_line: &request.command_line,
            working_dir: &request.working_dir,
            timeout_ms: request.timeout.map(|t| t.as_millis()),
        };
        record_result(&self.recorder, "process", "run", &input, &result);
        result
    }
}
