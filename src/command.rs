//! Command executor: one external tool invocation and the result of its last run.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::adapters::live::LiveProcessRunner;
use crate::context::ExecContext;
use crate::error::CommandError;
use crate::options::{ConfiguredValue, OptionStore};
use crate::ports::process::{CancelToken, ProcessRequest, ProcessRunner, EXIT_NOT_OK};
use crate::resolve;
use crate::schema::OptionSchema;
use crate::value::{ArgText, OptionValue};

/// A configured invocation of an external tool.
///
/// Options and parameters may change freely between runs. Each
/// [`execute`](Self::execute) replaces the previous exit code and output.
///
/// ```no_run
/// use std::sync::Arc;
/// use toolcmd::{Command, OptionSchema};
///
/// let schema = OptionSchema::new().switch("long", "l").switch("all", "a");
/// let mut ls = Command::new("ls", Arc::new(schema))?;
/// ls.enable("long")?.enable("all")?.add_parameter("/tmp")?;
/// assert_eq!(ls.render(), "ls -la /tmp");
///
/// let code = ls.execute()?.exit_code();
/// println!("{code:?}: {}", ls.stdout().unwrap_or_default());
/// # Ok::<(), toolcmd::CommandError>(())
/// ```
pub struct Command {
    executable: String,
    working_dir: PathBuf,
    store: OptionStore,
    runner: Arc<dyn ProcessRunner>,
    timeout: Option<Duration>,
    cancel: Option<CancelToken>,
    exit_code: Option<i32>,
    stdout: Option<String>,
    stderr: Option<String>,
}

impl Command {
    /// A command for `executable` that spawns real processes.
    ///
    /// # Errors
    ///
    /// `InvalidExecutable` if the trimmed path is empty or not runnable.
    pub fn new(executable: &str, schema: Arc<OptionSchema>) -> Result<Self, CommandError> {
        Self::with_runner(executable, schema, Arc::new(LiveProcessRunner::default()))
    }

    /// A command that runs through `runner`.
    ///
    /// # Errors
    ///
    /// `InvalidExecutable` if the trimmed path is empty or not runnable.
    pub fn with_runner(
        executable: &str,
        schema: Arc<OptionSchema>,
        runner: Arc<dyn ProcessRunner>,
    ) -> Result<Self, CommandError> {
        let executable = validate_executable(executable)?;
        let working_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Ok(Self {
            executable,
            working_dir,
            store: OptionStore::new(schema),
            runner,
            timeout: None,
            cancel: None,
            exit_code: None,
            stdout: None,
            stderr: None,
        })
    }

    /// A command using the context's runner and default timeout.
    ///
    /// # Errors
    ///
    /// `InvalidExecutable` if the trimmed path is empty or not runnable.
    pub fn from_context(
        executable: &str,
        schema: Arc<OptionSchema>,
        context: &ExecContext,
    ) -> Result<Self, CommandError> {
        let mut command = Self::with_runner(executable, schema, context.runner())?;
        command.timeout = context.timeout();
        Ok(command)
    }

    /// The executable as given at construction, trimmed.
    #[must_use]
    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Replaces the executable.
    ///
    /// # Errors
    ///
    /// `InvalidExecutable` if the trimmed path is empty or not runnable; the
    /// previous executable is kept.
    pub fn set_executable(&mut self, executable: &str) -> Result<&mut Self, CommandError> {
        self.executable = validate_executable(executable)?;
        Ok(self)
    }

    /// Directory the child starts in.
    #[must_use]
    pub fn working_directory(&self) -> &Path {
        &self.working_dir
    }

    /// Changes the directory the child starts in. Not checked until the next run.
    pub fn set_working_directory(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.working_dir = dir.into();
        self
    }

    /// Deadline for each run.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Sets or clears the deadline for each run.
    pub fn set_timeout(&mut self, timeout: Option<Duration>) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Sets or clears the token that aborts a run in progress.
    pub fn set_cancel_token(&mut self, token: Option<CancelToken>) -> &mut Self {
        self.cancel = token;
        self
    }

    /// Configured options and parameters.
    #[must_use]
    pub fn store(&self) -> &OptionStore {
        &self.store
    }

    /// See [`OptionStore::set_option`].
    ///
    /// # Errors
    ///
    /// Same as [`OptionStore::set_option`].
    pub fn set_option(
        &mut self,
        name: &str,
        value: impl Into<OptionValue>,
    ) -> Result<&mut Self, CommandError> {
        self.store.set_option(name, value)?;
        Ok(self)
    }

    /// See [`OptionStore::enable`].
    ///
    /// # Errors
    ///
    /// Same as [`OptionStore::set_option`].
    pub fn enable(&mut self, name: &str) -> Result<&mut Self, CommandError> {
        self.store.enable(name)?;
        Ok(self)
    }

    /// See [`OptionStore::set_options`].
    ///
    /// # Errors
    ///
    /// The first error raised while applying the batch.
    pub fn set_options<I, K, V>(&mut self, options: I) -> Result<&mut Self, CommandError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<OptionValue>,
    {
        self.store.set_options(options)?;
        Ok(self)
    }

    /// Removes every configured option.
    pub fn clear_options(&mut self) -> &mut Self {
        self.store.clear_options();
        self
    }

    /// Current value of an option.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&ConfiguredValue> {
        self.store.option(name)
    }

    /// Rendered options, see [`OptionStore::options_string`].
    #[must_use]
    pub fn options_string(&self) -> String {
        self.store.options_string()
    }

    /// See [`OptionStore::add_parameter`].
    ///
    /// # Errors
    ///
    /// `NonStringableValue` if the value has no text form.
    pub fn add_parameter<T: ArgText + ?Sized>(
        &mut self,
        value: &T,
    ) -> Result<&mut Self, CommandError> {
        self.store.add_parameter(value)?;
        Ok(self)
    }

    /// See [`OptionStore::set_parameters`].
    ///
    /// # Errors
    ///
    /// `NonStringableValue` if any value has no text form.
    pub fn set_parameters<I>(&mut self, values: I) -> Result<&mut Self, CommandError>
    where
        I: IntoIterator,
        I::Item: ArgText,
    {
        self.store.set_parameters(values)?;
        Ok(self)
    }

    /// Removes every positional parameter.
    pub fn clear_parameters(&mut self) -> &mut Self {
        self.store.clear_parameters();
        self
    }

    /// Positional parameters in order.
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        self.store.parameters()
    }

    /// Rendered parameters, see [`OptionStore::parameters_string`].
    #[must_use]
    pub fn parameters_string(&self) -> String {
        self.store.parameters_string()
    }

    /// The full command line: executable, options, parameters.
    #[must_use]
    pub fn render(&self) -> String {
        let mut line = self.executable.clone();
        line.push_str(&self.store.options_string());
        line.push_str(&self.store.parameters_string());
        line
    }

    /// Runs the command and blocks until the child exits.
    ///
    /// The previous result is cleared first: the exit code becomes `-1` and
    /// both outputs empty, which is what remains if the run fails. A non-zero
    /// exit status is a successful run; inspect [`exit_code`](Self::exit_code).
    ///
    /// # Errors
    ///
    /// `SpawnFailure` if the process cannot be created, `TimedOut` or
    /// `Cancelled` if it was killed, `Io` if its output could not be read.
    pub fn execute(&mut self) -> Result<&mut Self, CommandError> {
        self.exit_code = Some(EXIT_NOT_OK);
        self.stdout = Some(String::new());
        self.stderr = Some(String::new());

        let request = ProcessRequest {
            command_line: self.render(),
            working_dir: self.working_dir.clone(),
            timeout: self.timeout,
            cancel: self.cancel.clone(),
        };
        debug!(
            command = %request.command_line,
            working_dir = %request.working_dir.display(),
            "executing command"
        );

        let output = self.runner.run(&request)?;
        self.exit_code = Some(output.exit_code);
        self.stdout = Some(output.stdout.trim().to_owned());
        self.stderr = Some(output.stderr.trim().to_owned());
        Ok(self)
    }

    /// Exit code of the last run, `None` before the first.
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Trimmed standard output of the last run, `None` before the first.
    #[must_use]
    pub fn stdout(&self) -> Option<&str> {
        self.stdout.as_deref()
    }

    /// Trimmed standard error of the last run, `None` before the first.
    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        self.stderr.as_deref()
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("executable", &self.executable)
            .field("working_dir", &self.working_dir)
            .field("store", &self.store)
            .field("timeout", &self.timeout)
            .field("exit_code", &self.exit_code)
            .finish_non_exhaustive()
    }
}

fn validate_executable(executable: &str) -> Result<String, CommandError> {
    let trimmed = executable.trim();
    if trimmed.is_empty() || !resolve::is_runnable(trimmed) {
        return Err(CommandError::InvalidExecutable(executable.to_owned()));
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::quote;
    use crate::ports::process::ProcessOutput;
    use std::sync::Mutex;

    /// Answers every run with a fixed result and remembers the requests.
    struct ScriptedRunner {
        outputs: Mutex<Vec<Result<ProcessOutput, CommandError>>>,
        requests: Mutex<Vec<ProcessRequest>>,
    }

    impl ScriptedRunner {
        fn new(outputs: Vec<Result<ProcessOutput, CommandError>>) -> Arc<Self> {
            Arc::new(Self { outputs: Mutex::new(outputs), requests: Mutex::new(Vec::new()) })
        }
    }

    impl ProcessRunner for ScriptedRunner {
        fn run(&self, request: &ProcessRequest) -> Result<ProcessOutput, CommandError> {
            self.requests.lock().unwrap().push(request.clone());
            self.outputs.lock().unwrap().remove(0)
        }
    }

    fn ok(exit_code: i32, stdout: &str, stderr: &str) -> Result<ProcessOutput, CommandError> {
        Ok(ProcessOutput { exit_code, stdout: stdout.into(), stderr: stderr.into() })
    }

    fn schema() -> Arc<OptionSchema> {
        Arc::new(
            OptionSchema::new()
                .switch("verbose", "v")
                .switch("archive", "a")
                .switch("delete", "delete")
                .repeatable("exclude", "exclude"),
        )
    }

    #[test]
    fn render_joins_executable_options_and_parameters() {
        let runner = ScriptedRunner::new(vec![]);
        let mut cmd = Command::with_runner("sh", schema(), runner).unwrap();
        assert_eq!(cmd.render(), "sh");

        cmd.enable("archive")
            .unwrap()
            .enable("verbose")
            .unwrap()
            .enable("delete")
            .unwrap()
            .set_option("exclude", ["*.o"])
            .unwrap()
            .set_parameters(["src/", "dest/"])
            .unwrap();
        assert_eq!(cmd.render(), format!("sh -av --delete --exclude {} src/ dest/", quote("*.o")));
    }

    #[test]
    fn rejects_empty_and_unknown_executables() {
        for bad in ["", "   ", "definitely-not-a-real-tool-4f1c"] {
            let err = Command::new(bad, schema()).unwrap_err();
            assert!(matches!(err, CommandError::InvalidExecutable(_)), "{bad:?}");
        }
    }

    #[test]
    fn executable_is_trimmed_and_replaceable() {
        let mut cmd = Command::new("  sh  ", schema()).unwrap();
        assert_eq!(cmd.executable(), "sh");

        let err = cmd.set_executable("").unwrap_err();
        assert!(matches!(err, CommandError::InvalidExecutable(_)));
        assert_eq!(cmd.executable(), "sh");
    }

    #[test]
    fn results_are_unset_before_first_run() {
        let cmd = Command::new("sh", schema()).unwrap();
        assert_eq!(cmd.exit_code(), None);
        assert_eq!(cmd.stdout(), None);
        assert_eq!(cmd.stderr(), None);
        assert_eq!(cmd.working_directory(), std::env::current_dir().unwrap());
    }

    #[test]
    fn execute_trims_and_overwrites_results() {
        let runner = ScriptedRunner::new(vec![ok(0, "  first\n", "warn\n"), ok(2, "", "")]);
        let mut cmd = Command::with_runner("sh", schema(), runner).unwrap();

        cmd.execute().unwrap();
        assert_eq!(cmd.exit_code(), Some(0));
        assert_eq!(cmd.stdout(), Some("first"));
        assert_eq!(cmd.stderr(), Some("warn"));

        cmd.execute().unwrap();
        assert_eq!(cmd.exit_code(), Some(2));
        assert_eq!(cmd.stdout(), Some(""));
        assert_eq!(cmd.stderr(), Some(""));
    }

    #[test]
    fn failed_run_leaves_sentinel_and_empty_output() {
        let spawn_error = Err(CommandError::SpawnFailure {
            command: "sh".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        let runner = ScriptedRunner::new(vec![ok(0, "stale", "stale"), spawn_error]);
        let mut cmd = Command::with_runner("sh", schema(), runner).unwrap();

        cmd.execute().unwrap();
        let err = cmd.execute().unwrap_err();
        assert!(matches!(err, CommandError::SpawnFailure { .. }));
        assert_eq!(cmd.exit_code(), Some(EXIT_NOT_OK));
        assert_eq!(cmd.stdout(), Some(""));
        assert_eq!(cmd.stderr(), Some(""));
    }

    #[test]
    fn request_carries_directory_deadline_and_token() {
        let runner = ScriptedRunner::new(vec![ok(0, "", "")]);
        let mut cmd = Command::with_runner("sh", schema(), runner.clone()).unwrap();
        let token = CancelToken::new();
        cmd.set_working_directory("/tmp")
            .set_timeout(Some(Duration::from_secs(5)))
            .set_cancel_token(Some(token.clone()));
        cmd.add_parameter("x").unwrap();

        cmd.execute().unwrap();
        let requests = runner.requests.lock().unwrap();
        assert_eq!(requests[0].command_line, "sh x");
        assert_eq!(requests[0].working_dir, PathBuf::from("/tmp"));
        assert_eq!(requests[0].timeout, Some(Duration::from_secs(5)));
        token.cancel();
        assert!(requests[0].cancel.as_ref().unwrap().is_cancelled());
    }

    #[test]
    fn context_supplies_runner_and_timeout() {
        let runner = ScriptedRunner::new(vec![ok(0, "from context", "")]);
        let ctx = ExecContext::with_runner(runner).with_timeout(Some(Duration::from_millis(250)));
        let mut cmd = Command::from_context("sh", schema(), &ctx).unwrap();

        assert_eq!(cmd.timeout(), Some(Duration::from_millis(250)));
        assert_eq!(cmd.execute().unwrap().stdout(), Some("from context"));
    }

    #[test]
    fn validation_failures_leave_command_unchanged() {
        let mut cmd = Command::new("sh", schema()).unwrap();
        cmd.enable("verbose").unwrap();
        assert!(cmd.set_option("bogus", true).is_err());
        assert!(cmd.set_option("verbose", "x").is_err());
        assert_eq!(cmd.options_string(), " -v");
        assert!(matches!(cmd.option("verbose"), Some(ConfiguredValue::Flag)));

        cmd.clear_options().clear_parameters();
        assert_eq!(cmd.render(), "sh");
    }
}
