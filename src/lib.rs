//! progtest - golden-file regression harness for program code generators
//!
//! Each registered program description is parsed, bound against package
//! schemas and handed to a caller-supplied [`Generator`] for one target
//! language. The generated entry file is compared byte for byte with a
//! recorded expectation, or written as the new expectation in record mode.

pub mod ast;
pub mod bind;
pub mod config;
pub mod diag;
pub mod error;
pub mod filter;
pub mod fixtures;
pub mod lexer;
pub mod orchestrator;
pub mod parser;
pub mod pipeline;
pub mod profile;
pub mod registry;
pub mod verify;

// Re-export commonly used types
pub use ast::{Document, Span, Spanned};
pub use bind::{PackageCache, Program, ResolutionHost, bind};
pub use config::{HarnessConfig, RunMode};
pub use diag::{Diagnostic, DiagnosticCategory, Diagnostics, Severity};
pub use error::{CaseFailure, ConfigurationError, FixtureError, RunError};
pub use lexer::lex;
pub use orchestrator::{CaseReport, Harness, Outcome, RunReport, assert_program_codegen};
pub use parser::{Parser, parse_source};
pub use pipeline::{GeneratedArtifactSet, Generator, GeneratorError, GeneratorOutput, HardError};
pub use registry::{CaseMode, Registry, TestCase};
