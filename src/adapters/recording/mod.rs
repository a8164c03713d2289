//! Recording adapters that capture interactions to cassettes.

pub mod process;

pub use process::RecordingProcessRunner;

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::json;

use crate::cassette::recorder::CassetteRecorder;
use crate::error::CommandError;

/// Records a `Result` interaction.
///
/// `Ok(v)` is stored as `{"ok": v}` and `Err(e)` as
/// `{"err": {"kind": e.kind(), "message": e.to_string()}}`, the shape the
/// replaying adapters read back.
pub(crate) fn record_result<T, I>(
    recorder: &Mutex<CassetteRecorder>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, CommandError>,
) where
    T: Serialize,
    I: Serialize,
{
    let input = serde_json::to_value(input)
        .unwrap_or_else(|e| json!({ "unserializable": e.to_string() }));
    let output = match result {
        Ok(value) => match serde_json::to_value(value) {
            Ok(value) => json!({ "ok": value }),
            Err(e) => json!({ "err": { "kind": "unserializable", "message": e.to_string() } }),
        },
        Err(err) => json!({ "err": { "kind": err.kind(), "message": err.to_string() } }),
    };

    recorder.lock().unwrap_or_else(PoisonError::into_inner).record(port, method, input, output);
}

/// Shared handle to a recorder, as held by recording adapters.
pub type SharedRecorder = Arc<Mutex<CassetteRecorder>>;
