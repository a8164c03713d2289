//! Replaying adapters that serve recorded interactions.

pub mod process;

pub use process::ReplayingProcessRunner;
