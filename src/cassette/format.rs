//! Cassette data structures.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CassetteError;

/// One recorded call on a port.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    /// Position in the recording, assigned by the recorder.
    pub seq: u64,
    /// Port name, e.g. `process`.
    pub port: String,
    /// Method invoked on the port.
    pub method: String,
    /// What the caller passed in.
    pub input: serde_json::Value,
    /// What the port returned.
    pub output: serde_json::Value,
}

/// A named, timestamped sequence of interactions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Cassette {
    /// Human-readable name.
    pub name: String,
    /// When the recording was written.
    pub recorded_at: DateTime<Utc>,
    /// Operating system the runs were recorded on.
    pub platform: String,
    /// Interactions in recording order.
    pub interactions: Vec<Interaction>,
}

impl Cassette {
    /// Reads a cassette from a YAML file.
    ///
    /// # Errors
    ///
    /// `CassetteError::Io` if the file cannot be read, `CassetteError::Parse`
    /// if it is not a cassette.
    pub fn load(path: &Path) -> Result<Self, CassetteError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| CassetteError::Io { path: path.to_path_buf(), source })?;
        serde_yaml::from_str(&content)
            .map_err(|source| CassetteError::Parse { path: path.to_path_buf(), source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loads_written_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs.cassette.yaml");
        let cassette = Cassette {
            name: "runs".into(),
            recorded_at: Utc::now(),
            platform: "linux".into(),
            interactions: vec![Interaction {
                seq: 0,
                port: "process".into(),
                method: "run".into(),
                input: json!({"command_line": "echo hi"}),
                output: json!({"ok": {"exit_code": 0, "stdout": "hi\n", "stderr": ""}}),
            }],
        };
        std::fs::write(&path, serde_yaml::to_string(&cassette).unwrap()).unwrap();

        assert_eq!(Cassette::load(&path).unwrap(), cassette);
    }

    #[test]
    fn load_reports_missing_and_malformed_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        assert!(matches!(Cassette::load(&missing), Err(CassetteError::Io { .. })));

        let garbage = dir.path().join("garbage.yaml");
        std::fs::write(&garbage, "name: [unterminated").unwrap();
        assert!(matches!(Cassette::load(&garbage), Err(CassetteError::Parse { .. })));
    }
}
