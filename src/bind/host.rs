//! Resolution hosts: where the binder looks up package schemas

use std::fs;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap as HashMap;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Directory under the fixture root holding `<package>.toml` schemas
pub const SCHEMA_DIR: &str = "schemas";

/// Declared type of a resource or function property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Number,
    Bool,
    Array,
    Object,
    Any,
}

impl PropertyType {
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Number => "number",
            PropertyType::Bool => "bool",
            PropertyType::Array => "array",
            PropertyType::Object => "object",
            PropertyType::Any => "any",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResourceSchema {
    pub inputs: HashMap<String, PropertyType>,
    pub outputs: HashMap<String, PropertyType>,
    pub required: Vec<String>,
}

impl ResourceSchema {
    /// Type of an attribute readable from a resource reference
    pub fn attribute(&self, name: &str) -> Option<PropertyType> {
        match name {
            "id" | "urn" => Some(PropertyType::String),
            _ => self
                .outputs
                .get(name)
                .or_else(|| self.inputs.get(name))
                .copied(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FunctionSchema {
    pub inputs: HashMap<String, PropertyType>,
    pub outputs: HashMap<String, PropertyType>,
}

/// One package schema file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSchema {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub resources: HashMap<String, ResourceSchema>,
    #[serde(default)]
    pub functions: HashMap<String, FunctionSchema>,
}

impl PackageSchema {
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

/// Schema lookups the binder needs
pub trait ResolutionHost {
    fn resource(&self, token: &str) -> Option<&ResourceSchema>;
    fn function(&self, token: &str) -> Option<&FunctionSchema>;
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("could not read schema {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid schema {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("package '{package}' redeclares '{token}'")]
    DuplicateToken { package: String, token: String },
}

/// Schemas for every package found under a fixture root
#[derive(Debug, Clone, Default)]
pub struct PackageCache {
    packages: Vec<(String, Option<String>)>,
    resources: HashMap<String, ResourceSchema>,
    functions: HashMap<String, FunctionSchema>,
}

impl PackageCache {
    /// Read `<root>/schemas/*.toml`. A root without a schema directory
    /// yields an empty cache.
    pub fn load(root: &Path) -> Result<Self, SchemaError> {
        let dir = root.join(SCHEMA_DIR);
        if !dir.is_dir() {
            debug!(dir = %dir.display(), "no schema directory, using empty package cache");
            return Ok(Self::default());
        }

        let entries = fs::read_dir(&dir).map_err(|source| SchemaError::Read {
            path: dir.clone(),
            source,
        })?;
        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SchemaError::Read {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                paths.push(path);
            }
        }
        // Directory order is platform dependent
        paths.sort();

        let mut packages = Vec::with_capacity(paths.len());
        for path in paths {
            let text = fs::read_to_string(&path).map_err(|source| SchemaError::Read {
                path: path.clone(),
                source,
            })?;
            let package = PackageSchema::from_toml_str(&text)
                .map_err(|source| SchemaError::Parse { path: path.clone(), source })?;
            debug!(package = %package.name, path = %path.display(), "loaded package schema");
            packages.push(package);
        }

        Self::from_packages(packages)
    }

    pub fn from_packages(packages: impl IntoIterator<Item = PackageSchema>) -> Result<Self, SchemaError> {
        let mut cache = Self::default();
        for package in packages {
            cache.insert(package)?;
        }
        Ok(cache)
    }

    fn insert(&mut self, package: PackageSchema) -> Result<(), SchemaError> {
        let PackageSchema {
            name,
            version,
            resources,
            functions,
        } = package;

        for (token, schema) in resources {
            if self.resources.contains_key(&token) {
                return Err(SchemaError::DuplicateToken { package: name, token });
            }
            self.resources.insert(token, schema);
        }
        for (token, schema) in functions {
            if self.functions.contains_key(&token) {
                return Err(SchemaError::DuplicateToken { package: name, token });
            }
            self.functions.insert(token, schema);
        }
        self.packages.push((name, version));
        Ok(())
    }

    /// (name, version) of every loaded package, in load order
    pub fn packages(&self) -> &[(String, Option<String>)] {
        &self.packages
    }
}

impl ResolutionHost for PackageCache {
    fn resource(&self, token: &str) -> Option<&ResourceSchema> {
        self.resources.get(token)
    }

    fn function(&self, token: &str) -> Option<&FunctionSchema> {
        self.functions.get(token)
    }
}
