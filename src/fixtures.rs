//! Fixture files on disk
//!
//! `<root>/<program>.<source ext>` holds the source program and
//! `<root>/<program>.<source ext>.<language ext>` the expected entry file.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;

use crate::config::{HarnessConfig, RunMode};
use crate::error::FixtureError;

#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
    source_extension: String,
}

impl FixtureStore {
    pub fn new(root: impl Into<PathBuf>, source_extension: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            source_extension: source_extension.into(),
        }
    }

    pub fn from_config(config: &HarnessConfig) -> Self {
        Self::new(config.fixture_root.clone(), config.source_extension.clone())
    }

    pub fn source_path(&self, program_id: &str) -> PathBuf {
        self.root.join(format!("{}.{}", program_id, self.source_extension))
    }

    pub fn expectation_path(&self, program_id: &str, extension: &str) -> PathBuf {
        self.root.join(format!("{}.{}.{}", program_id, self.source_extension, extension))
    }

    pub fn load_source(&self, program_id: &str) -> Result<Vec<u8>, FixtureError> {
        read(self.source_path(program_id))
    }

    /// The recorded entry file. Absence is an error when verifying and
    /// `None` when recording.
    pub fn load_expectation(
        &self,
        program_id: &str,
        extension: &str,
        mode: RunMode,
    ) -> Result<Option<Vec<u8>>, FixtureError> {
        match read(self.expectation_path(program_id, extension)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(FixtureError::Missing { .. }) if mode.is_record() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Overwrite the expectation, creating the fixture root if needed
    pub fn write_expectation(
        &self,
        program_id: &str,
        extension: &str,
        bytes: &[u8],
    ) -> Result<(), FixtureError> {
        let path = self.expectation_path(program_id, extension);
        fs::create_dir_all(&self.root).map_err(|source| FixtureError::Write {
            path: self.root.clone(),
            source,
        })?;
        fs::write(&path, bytes).map_err(|source| FixtureError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "wrote expectation");
        Ok(())
    }
}

fn read(path: PathBuf) -> Result<Vec<u8>, FixtureError> {
    match fs::read(&path) {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(FixtureError::Missing { path }),
        Err(source) => Err(FixtureError::Read { path, source }),
    }
}
