//! Error taxonomy of the harness
//!
//! Per-case errors ([`FixtureError`], [`HardError`](crate::pipeline::HardError),
//! [`CaseFailure`]) end up inside that case's report. Only [`RunError`]
//! aborts a whole run.

use std::path::PathBuf;

use thiserror::Error;

use crate::diag::Diagnostics;
use crate::pipeline::{GeneratorError, HardError};
use crate::verify::Mismatch;

/// The harness was asked to run a language it has no profile for
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("language {language:?} not recognized")]
pub struct ConfigurationError {
    pub language: String,
}

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("could not read {}: fixture does not exist", path.display())]
    Missing { path: PathBuf },
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single test case failed
#[derive(Debug, Error)]
pub enum CaseFailure {
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    #[error(transparent)]
    Hard(#[from] HardError),

    /// Error-severity diagnostics remained after filtering
    #[error("failed to generate program:\n{diagnostics}")]
    Diagnostics { diagnostics: Diagnostics },

    /// The generator itself reported an error. `diagnostics` is the
    /// filtered list, evaluated regardless.
    #[error("generator failed: {error}{}", trailing_lines(diagnostics))]
    Generator {
        error: GeneratorError,
        diagnostics: Diagnostics,
    },

    #[error("generated files do not include entry file {entry_file:?} (found: {})", found.join(", "))]
    MissingEntryFile { entry_file: String, found: Vec<String> },

    #[error(transparent)]
    Mismatch(#[from] Mismatch),
}

/// Diagnostics on their own lines after a headline, or nothing
fn trailing_lines(diagnostics: &Diagnostics) -> String {
    if diagnostics.is_empty() {
        String::new()
    } else {
        format!("\n{diagnostics}")
    }
}

/// Errors that stop a whole run
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// Recording must not leave a partially updated fixture set behind
    #[error("failed to record expectation for {program_id}: {source}")]
    Record {
        program_id: String,
        #[source]
        source: FixtureError,
    },
}
