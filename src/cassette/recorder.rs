//! Accumulates interactions and writes them out as a cassette.

use std::path::{Path, PathBuf};

use chrono::Utc;

use super::format::{Cassette, Interaction};
use crate::error::CassetteError;

/// Collects interactions in memory and writes them as a YAML cassette.
#[derive(Debug)]
pub struct CassetteRecorder {
    path: PathBuf,
    name: String,
    interactions: Vec<Interaction>,
}

impl CassetteRecorder {
    /// A recorder that writes to `path`.
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self { path: path.into(), name: name.into(), interactions: Vec::new() }
    }

    /// Destination file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of interactions recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Appends an interaction; its `seq` is its position in the recording.
    pub fn record(
        &mut self,
        port: impl Into<String>,
        method: impl Into<String>,
        input: serde_json::Value,
        output: serde_json::Value,
    ) {
        let seq = self.interactions.len() as u64;
        self.interactions.push(Interaction {
            seq,
            port: port.into(),
            method: method.into(),
            input,
            output,
        });
    }

    /// Writes everything recorded so far, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be serialized or written.
    pub fn flush(&self) -> Result<&Path, CassetteError> {
        let cassette = Cassette {
            name: self.name.clone(),
            recorded_at: Utc::now(),
            platform: std::env::consts::OS.to_owned(),
            interactions: self.interactions.clone(),
        };
        let yaml = serde_yaml::to_string(&cassette)?;
        std::fs::write(&self.path, yaml)
            .map_err(|source| CassetteError::Io { path: self.path.clone(), source })?;
        Ok(&self.path)
    }

    /// Writes the cassette and returns its path.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be serialized or written.
    pub fn finish(self) -> Result<PathBuf, CassetteError> {
        self.flush()?;
        Ok(self.path)
    }
}
