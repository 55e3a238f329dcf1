//! Harness configuration and run mode

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Optional configuration file, looked up in the base directory
pub const CONFIG_FILE: &str = "progtest.toml";

/// Environment variable switching a run into record mode
pub const ACCEPT_VAR: &str = "PROGTEST_ACCEPT";

/// Whether a run compares against expectations or rewrites them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Verify,
    Record,
}

impl RunMode {
    /// Read [`ACCEPT_VAR`] once. Any non-empty value selects record mode.
    pub fn from_env() -> Self {
        Self::from_accept_value(std::env::var(ACCEPT_VAR).ok().as_deref())
    }

    pub fn from_accept_value(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => RunMode::Record,
            _ => RunMode::Verify,
        }
    }

    pub fn is_record(self) -> bool {
        self == RunMode::Record
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Where fixtures live and how source fixtures are named
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    pub fixture_root: PathBuf,
    /// Extension of source fixtures, without the dot
    pub source_extension: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            fixture_root: PathBuf::from("tests/testdata"),
            source_extension: "pp".to_string(),
        }
    }
}

impl HarnessConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// Load `<base>/progtest.toml`, or defaults when it does not exist.
    /// A relative `fixture_root` is resolved against `base`.
    pub fn load_or_default(base: &Path) -> Result<Self, ConfigError> {
        let path = base.join(CONFIG_FILE);
        let mut config = if path.is_file() {
            let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            let config = Self::from_toml_str(&text)
                .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
            debug!(path = %path.display(), "loaded harness configuration");
            config
        } else {
            Self::default()
        };

        if config.fixture_root.is_relative() {
            config.fixture_root = base.join(&config.fixture_root);
        }
        Ok(config)
    }

    /// Replace the fixture root, keeping every other setting
    pub fn with_fixture_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.fixture_root = root.into();
        self
    }
}
