//! Expectation comparison and recording

use similar::TextDiff;
use thiserror::Error;

use crate::error::FixtureError;
use crate::fixtures::FixtureStore;

/// Generated entry file differs from the recorded expectation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("generated output does not match expectation:\n{diff}")]
pub struct Mismatch {
    pub expected: Vec<u8>,
    pub actual: Vec<u8>,
    /// Unified line diff, expected to actual
    pub diff: String,
}

impl Mismatch {
    fn new(expected: &[u8], actual: &[u8]) -> Self {
        let before = String::from_utf8_lossy(expected);
        let after = String::from_utf8_lossy(actual);
        let diff = TextDiff::from_lines(&*before, &*after)
            .unified_diff()
            .header("expected", "actual")
            .to_string();
        Self {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
            diff,
        }
    }
}

/// Byte-for-byte comparison
pub fn verify(expected: &[u8], actual: &[u8]) -> Result<(), Mismatch> {
    if expected == actual {
        Ok(())
    } else {
        Err(Mismatch::new(expected, actual))
    }
}

pub fn record(
    store: &FixtureStore,
    program_id: &str,
    extension: &str,
    actual: &[u8],
) -> Result<(), FixtureError> {
    store.write_expectation(program_id, extension, actual)
}
