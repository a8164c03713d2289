//! Option catalogs for specific tools.
//!
//! Each catalog is a static table turned into a shared [`OptionSchema`] on
//! first use. Catalogs carry no behaviour of their own.

pub mod rsync;
pub mod ssh;

pub use rsync::Rsync;
pub use ssh::Ssh;

use std::sync::Arc;

use crate::command::Command;
use crate::context::ExecContext;
use crate::error::CommandError;
use crate::schema::OptionSchema;

/// A tool with a fixed executable name and option catalog.
pub trait Tool {
    /// Executable name resolved on `PATH`.
    const EXECUTABLE: &'static str;

    /// The tool's option schema.
    fn schema() -> Arc<OptionSchema>;

    /// A command that spawns the tool directly.
    ///
    /// # Errors
    ///
    /// `InvalidExecutable` if the tool is not installed.
    fn command() -> Result<Command, CommandError> {
        Command::new(Self::EXECUTABLE, Self::schema())
    }

    /// A command that runs through the context's runner.
    ///
    /// # Errors
    ///
    /// `InvalidExecutable` if the tool is not installed.
    fn command_in(context: &ExecContext) -> Result<Command, CommandError> {
        Command::from_context(Self::EXECUTABLE, Self::schema(), context)
    }
}
