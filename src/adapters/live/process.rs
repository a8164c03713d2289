//! Live process runner using `std::process::Command`.

use std::io::{self, Read};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::CommandError;
use crate::ports::process::{ProcessOutput, ProcessRequest, ProcessRunner, EXIT_NOT_OK};

type Reader = Receiver<io::Result<Vec<u8>>>;

/// Runs command lines through the system shell.
///
/// Stdout and stderr are drained on their own threads while the child runs,
/// so a chatty child cannot block on a full pipe. A deadline or cancel token
/// bounds both the wait for the child and the wait for its output, which a
/// background grandchild may hold open after the child exits.
#[derive(Debug, Clone)]
pub struct LiveProcessRunner {
    poll_interval: Duration,
}

impl LiveProcessRunner {
    /// A runner that checks deadlines and cancellation every `poll_interval`.
    #[must_use]
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    fn wait(
        &self,
        child: &mut Child,
        request: &ProcessRequest,
        started: Instant,
    ) -> Result<ExitStatus, CommandError> {
        let io_error = |source| CommandError::Io { command: request.command_line.clone(), source };

        if !is_bounded(request) {
            return child.wait().map_err(io_error);
        }

        loop {
            if let Some(status) = child.try_wait().map_err(io_error)? {
                return Ok(status);
            }
            if let Some(err) = limit_reached(request, started) {
                warn!(command = %request.command_line, "{err}, killing child");
                kill(child);
                return Err(err);
            }
            thread::sleep(self.poll_interval);
        }
    }

    fn collect(
        &self,
        reader: Option<Reader>,
        request: &ProcessRequest,
        started: Instant,
    ) -> Result<String, CommandError> {
        let Some(reader) = reader else {
            return Ok(String::new());
        };
        let received = if is_bounded(request) {
            loop {
                match reader.recv_timeout(self.poll_interval) {
                    Ok(result) => break Some(result),
                    Err(RecvTimeoutError::Disconnected) => break None,
                    Err(RecvTimeoutError::Timeout) => {}
                }
                if let Some(err) = limit_reached(request, started) {
                    warn!(command = %request.command_line, "{err} while output was still open");
                    return Err(err);
                }
            }
        } else {
            reader.recv().ok()
        };

        let bytes = received
            .unwrap_or_else(|| Err(io::Error::other("output reader thread panicked")))
            .map_err(|source| CommandError::Io { command: request.command_line.clone(), source })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl Default for LiveProcessRunner {
    fn default() -> Self {
        Self::with_poll_interval(Duration::from_millis(10))
    }
}

impl ProcessRunner for LiveProcessRunner {
    fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput, CommandError> {
        let started = Instant::now();
        let mut child = shell_command(&request.command_line)
            .current_dir(&request.working_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CommandError::SpawnFailure {
                command: request.command_line.clone(),
                source,
            })?;
        debug!(pid = child.id(), "spawned child");

        drop(child.stdin.take());
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        // Once a limit fires the reader threads are left to finish on their
        // own when the pipes close.
        let status = self.wait(&mut child, request, started)?;
        let exit_code = exit_code(status);
        debug!(exit_code, "child exited");

        Ok(ProcessOutput {
            exit_code,
            stdout: self.collect(stdout, request, started)?,
            stderr: self.collect(stderr, request, started)?,
        })
    }
}

fn is_bounded(request: &ProcessRequest) -> bool {
    request.timeout.is_some() || request.cancel.is_some()
}

/// The error for an elapsed deadline or a fired cancel token, if any.
fn limit_reached(request: &ProcessRequest, started: Instant) -> Option<CommandError> {
    if let Some(after) = request.timeout.filter(|after| started.elapsed() >= *after) {
        return Some(CommandError::TimedOut { command: request.command_line.clone(), after });
    }
    request
        .cancel
        .as_ref()
        .filter(|token| token.is_cancelled())
        .map(|_| CommandError::Cancelled { command: request.command_line.clone() })
}

#[cfg(not(windows))]
fn shell_command(command_line: &str) -> Command {
    let mut command = Command::new("sh");
    command.arg("-c").arg(command_line);
    command
}

#[cfg(windows)]
fn shell_command(command_line: &str) -> Command {
    use std::os::windows::process::CommandExt;

    let mut command = Command::new("cmd");
    command.arg("/C").raw_arg(command_line);
    command
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> Reader {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut bytes = Vec::new();
        let result = pipe.read_to_end(&mut bytes).map(|_| bytes);
        let _ = tx.send(result);
    });
    rx
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;

    status.code().or_else(|| status.signal().map(|signal| 128 + signal)).unwrap_or(EXIT_NOT_OK)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(EXIT_NOT_OK)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::ports::process::CancelToken;

    fn request(command_line: &str) -> ProcessRequest {
        ProcessRequest::new(command_line, std::env::temp_dir())
    }

    #[test]
    fn runs_echo_command() {
        let result = LiveProcessRunner::default().run(&request("echo hello")).unwrap();

        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "hello\n");
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn captures_exit_code_and_stderr() {
        let result = LiveProcessRunner::default().run(&request("echo oops >&2; exit 42")).unwrap();

        assert_eq!(result.exit_code, 42);
        assert_eq!(result.stderr, "oops\n");
    }

    #[test]
    fn signal_termination_maps_to_128_plus_signal() {
        let result = LiveProcessRunner::default().run(&request("kill -9 $$")).unwrap();
        assert_eq!(result.exit_code, 137);
    }

    #[test]
    fn runs_in_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "").unwrap();

        let result = LiveProcessRunner::default()
            .run(&ProcessRequest::new("ls", dir.path()))
            .unwrap();
        assert_eq!(result.stdout.trim(), "marker.txt");
    }

    #[test]
    fn large_output_does_not_deadlock() {
        let result = LiveProcessRunner::default()
            .run(&request("head -c 300000 /dev/zero | tr '\\0' a; head -c 300000 /dev/zero >&2"))
            .unwrap();
        assert_eq!(result.stdout.len(), 300_000);
        assert_eq!(result.stderr.len(), 300_000);
    }

    #[test]
    fn missing_working_directory_is_spawn_failure() {
        let err = LiveProcessRunner::default()
            .run(&ProcessRequest::new("true", "/definitely/not/a/dir"))
            .unwrap_err();
        assert!(matches!(err, CommandError::SpawnFailure { .. }));
    }

    #[test]
    fn deadline_kills_child() {
        let mut req = request("sleep 5");
        req.timeout = Some(Duration::from_millis(100));

        let started = Instant::now();
        let err = LiveProcessRunner::default().run(&req).unwrap_err();
        assert!(matches!(err, CommandError::TimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn fast_child_beats_deadline() {
        let mut req = request("printf done");
        req.timeout = Some(Duration::from_secs(10));

        let result = LiveProcessRunner::default().run(&req).unwrap();
        assert_eq!(result.stdout, "done");
    }

    #[test]
    fn deadline_covers_output_held_open_by_background_job() {
        let mut req = request("sleep 3 & echo hi");
        req.timeout = Some(Duration::from_millis(200));

        let started = Instant::now();
        let err = LiveProcessRunner::default().run(&req).unwrap_err();
        assert!(matches!(err, CommandError::TimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn unbounded_run_waits_for_background_output() {
        let result = LiveProcessRunner::default()
            .run(&request("(sleep 0.2; echo late) & echo early"))
            .unwrap();
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "early\nlate\n");
    }

    #[test]
    fn cancel_token_kills_child() {
        let token = CancelToken::new();
        let mut req = request("sleep 5");
        req.cancel = Some(token.clone());

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            token.cancel();
        });
        let err = LiveProcessRunner::default().run(&req).unwrap_err();
        canceller.join().unwrap();
        assert!(matches!(err, CommandError::Cancelled { .. }));
    }
}
