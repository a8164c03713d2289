//! Port traits defining external boundaries.
//!
//! Implementations live in `src/adapters/`.

pub mod process;

pub use process::{CancelToken, ProcessOutput, ProcessRequest, ProcessRunner, EXIT_NOT_OK};
