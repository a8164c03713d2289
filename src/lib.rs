//! Typed builder and executor for external command-line tool invocations.
//!
//! A [`Command`] pairs an executable with an [`OptionSchema`]. Options are
//! validated against the schema as they are set, rendered into an escaped
//! command line, and run through a [`ProcessRunner`](ports::ProcessRunner)
//! that captures the exit code, stdout and stderr.
//!
//! ```no_run
//! use toolcmd::tools::{Rsync, Tool};
//!
//! let mut rsync = Rsync::command()?;
//! rsync
//!     .enable("archive")?
//!     .enable("delete")?
//!     .set_option("exclude", [".git", "target"])?
//!     .set_parameters(["./site/", "deploy@example.com:/srv/site/"])?;
//!
//! if rsync.execute()?.exit_code() != Some(0) {
//!     eprintln!("{}", rsync.stderr().unwrap_or_default());
//! }
//! # Ok::<(), toolcmd::CommandError>(())
//! ```

pub mod adapters;
pub mod cassette;
pub mod command;
pub mod config;
pub mod context;
pub mod error;
pub mod escape;
pub mod logging;
pub mod options;
pub mod ports;
pub mod resolve;
pub mod schema;
pub mod tools;
pub mod value;

pub use command::Command;
pub use config::ExecConfig;
pub use context::ExecContext;
pub use error::{CassetteError, CommandError};
pub use options::{ConfiguredValue, OptionStore};
pub use ports::{CancelToken, ProcessOutput, ProcessRequest, ProcessRunner};
pub use schema::{OptionSchema, OptionSpec};
pub use value::{ArgText, Displayed, OptionValue};
