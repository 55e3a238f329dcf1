//! Per-language output conventions

use crate::error::ConfigurationError;

/// Where a language's generated entry file is found and how its
/// expectation fixture is named
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageProfile {
    pub language: &'static str,
    /// Suffix of the expectation fixture: `<program>.<source ext>.<extension>`
    pub extension: &'static str,
    /// Key in the generator output compared against the expectation
    pub entry_file: &'static str,
}

const PROFILES: &[LanguageProfile] = &[
    LanguageProfile {
        language: "python",
        extension: "py",
        entry_file: "__main__.py",
    },
    LanguageProfile {
        language: "nodejs",
        extension: "ts",
        entry_file: "index.ts",
    },
    LanguageProfile {
        language: "go",
        extension: "go",
        entry_file: "main.go",
    },
    LanguageProfile {
        language: "dotnet",
        extension: "cs",
        entry_file: "MyStack.cs",
    },
];

pub fn resolve(language: &str) -> Result<LanguageProfile, ConfigurationError> {
    PROFILES
        .iter()
        .find(|p| p.language == language)
        .copied()
        .ok_or_else(|| ConfigurationError {
            language: language.to_string(),
        })
}

/// Every language with a profile
pub fn languages() -> impl Iterator<Item = &'static str> {
    PROFILES.iter().map(|p| p.language)
}
