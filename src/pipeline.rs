//! Parse, bind, generate
//!
//! The per-language code generators are supplied by the caller through
//! the [`Generator`] trait. Closures taking a [`Program`] qualify.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::debug;

use crate::bind::{self, Program, ResolutionHost};
use crate::diag::{Diagnostic, Diagnostics};
use crate::parser::parse_source;

/// An error a generator reports alongside its output
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct GeneratorError {
    pub message: String,
}

impl GeneratorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Everything a generator returns for one program
#[derive(Debug, Clone, Default)]
pub struct GeneratorOutput {
    pub files: BTreeMap<String, Vec<u8>>,
    pub diagnostics: Diagnostics,
    pub error: Option<GeneratorError>,
}

impl GeneratorOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(name.into(), contents.into());
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostics.push(diagnostic);
        self
    }

    pub fn with_error(mut self, error: GeneratorError) -> Self {
        self.error = Some(error);
        self
    }
}

/// Generates source files for one target language
pub trait Generator {
    fn generate(&self, program: &Program) -> GeneratorOutput;
}

impl<F> Generator for F
where
    F: Fn(&Program) -> GeneratorOutput,
{
    fn generate(&self, program: &Program) -> GeneratorOutput {
        self(program)
    }
}

/// Output of one pipeline run. Diagnostics hold the binder's warnings
/// followed by the generator's diagnostics.
#[derive(Debug, Clone)]
pub struct GeneratedArtifactSet {
    pub files: BTreeMap<String, Vec<u8>>,
    pub diagnostics: Diagnostics,
    pub generator_error: Option<GeneratorError>,
}

impl GeneratedArtifactSet {
    pub fn entry(&self, entry_file: &str) -> Option<&[u8]> {
        self.files.get(entry_file).map(Vec::as_slice)
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }
}

/// Failures that stop the pipeline before a generator runs
#[derive(Debug, Error)]
pub enum HardError {
    #[error("could not parse {name}: {message}")]
    ParseFailed { name: String, message: String },

    #[error("could not bind {name}:\n{rendered}")]
    BindFailed {
        name: String,
        diagnostics: Diagnostics,
        /// Diagnostics rendered with source positions
        rendered: String,
    },
}

/// Parse and bind `source`. Warnings come back with the program; any
/// error diagnostic is a [`HardError::BindFailed`].
pub fn bind_source(
    source: &[u8],
    program_id: &str,
    host: &dyn ResolutionHost,
) -> Result<(Program, Diagnostics), HardError> {
    let text = std::str::from_utf8(source).map_err(|e| HardError::ParseFailed {
        name: program_id.to_string(),
        message: format!("source is not valid UTF-8: {}", e),
    })?;

    let document = parse_source(text, program_id).map_err(|e| HardError::ParseFailed {
        name: program_id.to_string(),
        message: e.format_with_source(text),
    })?;

    let (program, diagnostics) = bind::bind(&document, host);
    if diagnostics.has_errors() {
        return Err(HardError::BindFailed {
            name: program_id.to_string(),
            rendered: diagnostics.format_with_source(text),
            diagnostics,
        });
    }
    debug!(
        program = program_id,
        nodes = program.nodes.len(),
        warnings = diagnostics.len(),
        "bound program"
    );
    Ok((program, diagnostics))
}

/// Run `source` through the front end and `generator`.
pub fn run<G: Generator + ?Sized>(
    source: &[u8],
    program_id: &str,
    host: &dyn ResolutionHost,
    generator: &G,
) -> Result<GeneratedArtifactSet, HardError> {
    let (program, mut diagnostics) = bind_source(source, program_id, host)?;

    let output = generator.generate(&program);
    diagnostics.extend(output.diagnostics);

    Ok(GeneratedArtifactSet {
        files: output.files,
        diagnostics,
        generator_error: output.error,
    })
}
