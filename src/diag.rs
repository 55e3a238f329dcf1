//! Diagnostics produced by binding and code generation
//!
//! Both the binder and the generators report problems as [`Diagnostic`]s
//! rather than failing outright. The harness decides afterwards which of
//! them are fatal for a test case.

use std::fmt;

use crate::ast::Span;

/// Summary prefix generators use for constructs they cannot express yet
pub const NYI_MARKER: &str = "not yet implemented";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Structured classification of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// A known, catalogued generator gap
    NotYetImplemented,
    /// Reference to a name that is not declared
    Unresolved,
    /// Disagreement with a package schema
    Schema,
    /// Literal of the wrong type
    Type,
    /// Declarations that depend on each other
    Cycle,
    /// Declared but never used
    Unused,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: Option<String>,
    pub span: Option<Span>,
    pub category: Option<DiagnosticCategory>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: None,
            span: None,
            category: None,
        }
    }

    pub fn warning(summary: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(summary)
        }
    }

    /// An error-severity diagnostic for a construct the generator cannot
    /// express yet. The summary carries [`NYI_MARKER`] so consumers that only
    /// see text classify it the same way.
    pub fn not_yet_implemented(what: impl fmt::Display) -> Self {
        Self::error(format!("{NYI_MARKER}: {what}"))
            .with_category(DiagnosticCategory::NotYetImplemented)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_category(mut self, category: DiagnosticCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Whether this diagnostic reports a tolerated "not yet implemented" gap.
    ///
    /// The category tag is authoritative; the summary prefix covers
    /// generators that only emit free text.
    pub fn is_not_yet_implemented(&self) -> bool {
        self.category == Some(DiagnosticCategory::NotYetImplemented)
            || self.summary.starts_with(NYI_MARKER)
    }

    /// Render with a `line:col` position when the diagnostic has a span
    pub fn format_with_source(&self, source: &str) -> String {
        let mut out = format!("{}: {}", self.severity, self.summary);
        if let Some(span) = self.span {
            out.push_str(&format!(" at {}", span.format_position(source)));
        }
        if let Some(detail) = &self.detail {
            out.push_str(&format!("\n  {}", detail));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.summary)?;
        if let Some(detail) = &self.detail {
            write!(f, " ({})", detail)?;
        }
        Ok(())
    }
}

/// An ordered list of diagnostics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.0.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_error())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.0
    }

    pub fn format_with_source(&self, source: &str) -> String {
        self.0
            .iter()
            .map(|d| d.format_with_source(source))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", d)?;
        }
        Ok(())
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self(diagnostics)
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
