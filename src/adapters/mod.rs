//! Adapter implementations for port traits.
//!
//! - `live`: spawns real processes.
//! - `recording`: wraps another runner and records every run to a cassette.
//! - `replaying`: serves recorded runs back from a cassette.

pub mod live;
pub mod recording;
pub mod replaying;
