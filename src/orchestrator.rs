//! Runs every registered case for one target language
//!
//! Each case is parsed, bound, generated, filtered and then compared with
//! (or recorded as) its expectation. A failing case is reported and its
//! siblings still run. Only an unknown language or a failed expectation
//! write stops the run.

use std::fmt;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::bind::{PackageCache, ResolutionHost, SchemaError};
use crate::config::{HarnessConfig, RunMode};
use crate::error::{CaseFailure, RunError};
use crate::filter::filter_diagnostics;
use crate::fixtures::FixtureStore;
use crate::pipeline::{self, Generator};
use crate::profile::{self, LanguageProfile};
use crate::registry::{CaseMode, Registry, TestCase};
use crate::verify;

pub struct Harness {
    registry: Registry,
    fixtures: FixtureStore,
    host: Box<dyn ResolutionHost>,
    mode: RunMode,
}

/// Result of one case for one language
#[derive(Debug)]
pub enum Outcome {
    Passed,
    Recorded,
    Skipped,
    Failed(CaseFailure),
}

impl Outcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    fn label(&self) -> &'static str {
        match self {
            Outcome::Passed => "PASS",
            Outcome::Recorded => "RECORDED",
            Outcome::Skipped => "SKIP",
            Outcome::Failed(_) => "FAIL",
        }
    }
}

#[derive(Debug)]
pub struct CaseReport {
    pub program_id: String,
    pub description: String,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub struct RunReport {
    pub language: String,
    pub mode: RunMode,
    pub cases: Vec<CaseReport>,
}

/// What a case that got through generation asks of the run
enum Evaluation {
    Passed,
    Record(Vec<u8>),
}

impl Harness {
    pub fn new(
        registry: Registry,
        fixtures: FixtureStore,
        host: Box<dyn ResolutionHost>,
        mode: RunMode,
    ) -> Self {
        Self {
            registry,
            fixtures,
            host,
            mode,
        }
    }

    /// The built-in registry over the configured fixture root, with
    /// schemas loaded from `<fixture root>/schemas`
    pub fn from_config(config: &HarnessConfig, mode: RunMode) -> Result<Self, SchemaError> {
        let host = PackageCache::load(&config.fixture_root)?;
        Ok(Self::new(
            Registry::builtin(),
            FixtureStore::from_config(config),
            Box::new(host),
            mode,
        ))
    }

    pub fn run_all<G: Generator + ?Sized>(
        &self,
        language: &str,
        generator: &G,
    ) -> Result<RunReport, RunError> {
        let profile = profile::resolve(language)?;
        info!(
            language,
            mode = ?self.mode,
            cases = self.registry.len(),
            "running program codegen cases"
        );

        let mut cases = Vec::with_capacity(self.registry.len());
        for case in &self.registry {
            let outcome = match case.mode_for(language) {
                CaseMode::Skip => {
                    debug!(program = %case.program_id, language, "skipped");
                    Outcome::Skipped
                }
                mode => self.run_case(case, &profile, mode == CaseMode::TolerateNyi, generator)?,
            };
            cases.push(CaseReport {
                program_id: case.program_id.clone(),
                description: case.description.clone(),
                outcome,
            });
        }

        let report = RunReport {
            language: language.to_string(),
            mode: self.mode,
            cases,
        };
        info!(
            language,
            passed = report.passed(),
            failed = report.failed(),
            skipped = report.skipped(),
            recorded = report.recorded(),
            "finished program codegen cases"
        );
        Ok(report)
    }

    fn run_case<G: Generator + ?Sized>(
        &self,
        case: &TestCase,
        profile: &LanguageProfile,
        tolerate_nyi: bool,
        generator: &G,
    ) -> Result<Outcome, RunError> {
        match self.evaluate(case, profile, tolerate_nyi, generator) {
            Ok(Evaluation::Passed) => {
                debug!(program = %case.program_id, language = profile.language, "passed");
                Ok(Outcome::Passed)
            }
            Ok(Evaluation::Record(actual)) => {
                verify::record(&self.fixtures, &case.program_id, profile.extension, &actual)
                    .map_err(|source| RunError::Record {
                        program_id: case.program_id.clone(),
                        source,
                    })?;
                info!(program = %case.program_id, language = profile.language, "recorded expectation");
                Ok(Outcome::Recorded)
            }
            Err(failure) => {
                warn!(program = %case.program_id, language = profile.language, "{}", failure);
                Ok(Outcome::Failed(failure))
            }
        }
    }

    fn evaluate<G: Generator + ?Sized>(
        &self,
        case: &TestCase,
        profile: &LanguageProfile,
        tolerate_nyi: bool,
        generator: &G,
    ) -> Result<Evaluation, CaseFailure> {
        let program_id = case.program_id.as_str();
        let source = self.fixtures.load_source(program_id)?;

        // Verify mode never reads back what it generated in the same run
        let expected = match self.mode {
            RunMode::Verify => self
                .fixtures
                .load_expectation(program_id, profile.extension, self.mode)?,
            RunMode::Record => None,
        };

        let artifacts = pipeline::run(&source, program_id, self.host.as_ref(), generator)?;
        let diagnostics = filter_diagnostics(&artifacts.diagnostics, tolerate_nyi);

        if let Some(error) = artifacts.generator_error {
            return Err(CaseFailure::Generator { error, diagnostics });
        }
        if diagnostics.has_errors() {
            return Err(CaseFailure::Diagnostics { diagnostics });
        }

        let Some(actual) = artifacts.entry(profile.entry_file) else {
            return Err(CaseFailure::MissingEntryFile {
                entry_file: profile.entry_file.to_string(),
                found: artifacts.file_names(),
            });
        };

        match expected {
            Some(expected) => {
                verify::verify(&expected, actual)?;
                Ok(Evaluation::Passed)
            }
            None => Ok(Evaluation::Record(actual.to_vec())),
        }
    }
}

impl RunReport {
    pub fn outcome(&self, program_id: &str) -> Option<&Outcome> {
        self.cases
            .iter()
            .find(|c| c.program_id == program_id)
            .map(|c| &c.outcome)
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.cases.iter().filter(|c| pred(&c.outcome)).count()
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(Outcome::is_failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped))
    }

    pub fn recorded(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Recorded))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&CaseReport, &CaseFailure)> {
        self.cases.iter().filter_map(|c| match &c.outcome {
            Outcome::Failed(failure) => Some((c, failure)),
            _ => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// # Panics
    ///
    /// Panics with the rendered report when any case failed.
    pub fn assert_success(&self) {
        if !self.is_success() {
            panic!("{}", self);
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for case in &self.cases {
            writeln!(
                f,
                "{:<8} {} ({})",
                case.outcome.label(),
                case.program_id,
                case.description
            )?;
            if let Outcome::Failed(failure) = &case.outcome {
                for line in failure.to_string().lines() {
                    writeln!(f, "    {}", line)?;
                }
            }
        }
        write!(
            f,
            "{}: {} passed, {} failed, {} skipped, {} recorded",
            self.language,
            self.passed(),
            self.failed(),
            self.skipped(),
            self.recorded()
        )
    }
}

/// Run the built-in cases for `language` from the current directory.
///
/// Reads `progtest.toml` when present and `PROGTEST_ACCEPT` for the run
/// mode. Meant to be called from one `#[test]` per target language.
///
/// # Panics
///
/// Panics when the harness cannot be set up, when the run aborts, or when
/// any case fails.
pub fn assert_program_codegen<G: Generator + ?Sized>(language: &str, generator: &G) {
    let base = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => panic!("could not determine the current directory: {}", e),
    };
    match run_program_codegen(&base, language, RunMode::from_env(), generator) {
        Ok(report) => report.assert_success(),
        Err(message) => panic!("{}", message),
    }
}

fn run_program_codegen<G: Generator + ?Sized>(
    base: &Path,
    language: &str,
    mode: RunMode,
    generator: &G,
) -> Result<RunReport, String> {
    let config = HarnessConfig::load_or_default(base).map_err(|e| e.to_string())?;
    let harness = Harness::from_config(&config, mode).map_err(|e| e.to_string())?;
    harness.run_all(language, generator).map_err(|e| e.to_string())
}
