//! Execution context: which process runner commands use, and how.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tracing::{debug, warn};

use crate::adapters::live::LiveProcessRunner;
use crate::adapters::recording::{RecordingProcessRunner, SharedRecorder};
use crate::adapters::replaying::ReplayingProcessRunner;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::cassette::replayer::CassetteReplayer;
use crate::config::ExecConfig;
use crate::error::CommandError;
use crate::ports::process::ProcessRunner;

/// Bundles the process runner and defaults shared by a group of commands.
///
/// Constructors wire up the live, recording or replaying runner. A recording
/// context writes its cassette when [`finish`](Self::finish)ed or dropped.
pub struct ExecContext {
    runner: Arc<dyn ProcessRunner>,
    timeout: Option<Duration>,
    recorder: Option<SharedRecorder>,
}

impl ExecContext {
    /// Spawns real processes.
    #[must_use]
    pub fn live() -> Self {
        Self { runner: Arc::new(LiveProcessRunner::default()), timeout: None, recorder: None }
    }

    /// Spawns real processes and records every run into a cassette at `path`.
    #[must_use]
    pub fn recording(path: &Path) -> Self {
        let name = path.file_stem().map_or_else(
            || "toolcmd-session".to_owned(),
            |stem| stem.to_string_lossy().into_owned(),
        );
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, name)));
        let runner = RecordingProcessRunner::new(
            Box::new(LiveProcessRunner::default()),
            Arc::clone(&recorder),
        );
        Self { runner: Arc::new(runner), timeout: None, recorder: Some(recorder) }
    }

    /// Serves runs from the cassette at `path` instead of spawning processes.
    ///
    /// # Errors
    ///
    /// `Cassette` if the file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, CommandError> {
        let cassette = Cassette::load(path)?;
        let runner = ReplayingProcessRunner::new(CassetteReplayer::new(&cassette));
        Ok(Self { runner: Arc::new(runner), timeout: None, recorder: None })
    }

    /// Uses a caller-supplied runner.
    #[must_use]
    pub fn with_runner(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner, timeout: None, recorder: None }
    }

    /// Picks the runner and default timeout from `config`.
    ///
    /// # Errors
    ///
    /// `Cassette` if a replay cassette cannot be loaded.
    pub fn from_config(config: &ExecConfig) -> Result<Self, CommandError> {
        let context = match (&config.record, &config.replay) {
            (Some(path), _) => Self::recording(path),
            (None, Some(path)) => Self::replaying(path)?,
            (None, None) => Self::live(),
        };
        Ok(context.with_timeout(config.timeout))
    }

    /// Sets the default deadline for commands built from this context.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The runner commands share.
    #[must_use]
    pub fn runner(&self) -> Arc<dyn ProcessRunner> {
        Arc::clone(&self.runner)
    }

    /// Default deadline for commands built from this context.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Writes the cassette of a recording context and returns its path.
    ///
    /// Returns `Ok(None)` for contexts that do not record.
    ///
    /// # Errors
    ///
    /// `Cassette` if the cassette cannot be written.
    pub fn finish(mut self) -> Result<Option<PathBuf>, CommandError> {
        let Some(recorder) = self.recorder.take() else {
            return Ok(None);
        };
        let recorder = recorder.lock().unwrap_or_else(PoisonError::into_inner);
        let path = recorder.flush()?.to_path_buf();
        debug!(path = %path.display(), runs = recorder.len(), "cassette written");
        Ok(Some(path))
    }
}

impl Drop for ExecContext {
    fn drop(&mut self) {
        if let Some(recorder) = self.recorder.take() {
            let recorder = recorder.lock().unwrap_or_else(PoisonError::into_inner);
            if let Err(e) = recorder.flush() {
                warn!("failed to write cassette: {e}");
            }
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::ports::process::ProcessRequest;

    #[test]
    fn recording_context_writes_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.cassette.yaml");
        {
            let ctx = ExecContext::recording(&path);
            ctx.runner().run(&ProcessRequest::new("echo one", dir.path())).unwrap();
        }

        let cassette = Cassette::load(&path).unwrap();
        assert_eq!(cassette.name, "session.cassette");
        assert_eq!(cassette.interactions.len(), 1);
    }

    #[test]
    fn recording_then_replaying_gives_same_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.yaml");
        let request = ProcessRequest::new("echo out; echo err >&2; exit 4", dir.path());

        let ctx = ExecContext::recording(&path);
        let recorded = ctx.runner().run(&request).unwrap();
        assert_eq!(ctx.finish().unwrap(), Some(path.clone()));

        let replayed = ExecContext::replaying(&path).unwrap().runner().run(&request).unwrap();
        assert_eq!(replayed, recorded);
    }

    #[test]
    fn from_config_selects_runner_and_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let config = ExecConfig {
            timeout: Some(Duration::from_secs(3)),
            record: Some(dir.path().join("rec.yaml")),
            ..ExecConfig::default()
        };
        let ctx = ExecContext::from_config(&config).unwrap();
        assert_eq!(ctx.timeout(), Some(Duration::from_secs(3)));
        assert!(ctx.finish().unwrap().is_some());

        let live = ExecContext::from_config(&ExecConfig::default()).unwrap();
        assert_eq!(live.finish().unwrap(), None);
    }

    #[test]
    fn replaying_missing_cassette_fails() {
        let err = ExecContext::replaying(Path::new("/definitely/missing.yaml")).err().unwrap();
        assert!(matches!(err, CommandError::Cassette(_)));
    }
}
