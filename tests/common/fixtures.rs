//! Temporary fixture roots

use std::fs;
use std::path::{Path, PathBuf};

use progtest::bind::SCHEMA_DIR;
use progtest::fixtures::FixtureStore;
use progtest::{Harness, PackageCache, Registry, RunMode, TestCase};
use tempfile::TempDir;

/// Schema for the `test` package used by the sources below
pub const TEST_SCHEMA: &str = r#"
name = "test"
version = "1.0.0"

[resources."test:index:Bucket"]
inputs = { name = "string", size = "number", tags = "object" }
outputs = { arn = "string" }
required = ["name"]

[functions."test:index:lookup"]
inputs = { key = "string" }
outputs = { value = "string" }
"#;

/// Binds cleanly against [`TEST_SCHEMA`]
pub const CLEAN_SOURCE: &str = r#"
config prefix "string" {
    default = "site"
}

resource bucket "test:index:Bucket" {
    name = prefix
    size = 10
}

output arn = bucket.arn
"#;

/// Fails to bind: the resource type does not exist
pub const UNBOUND_SOURCE: &str = r#"
resource bucket "test:index:Missing" {
    name = "x"
}
"#;

/// Fails to parse
pub const UNPARSABLE_SOURCE: &str = "resource bucket {\n";

/// A fixture root in a temporary directory
pub struct FixtureDir {
    dir: TempDir,
}

impl FixtureDir {
    pub fn new() -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        };
        fixture.schema("test", TEST_SCHEMA);
        fixture
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn source(&self, program_id: &str, text: &str) -> &Self {
        fs::write(self.path().join(format!("{}.pp", program_id)), text)
            .expect("failed to write source fixture");
        self
    }

    pub fn expectation(&self, program_id: &str, extension: &str, bytes: &str) -> &Self {
        fs::write(self.expectation_path(program_id, extension), bytes)
            .expect("failed to write expectation");
        self
    }

    pub fn schema(&self, package: &str, text: &str) -> &Self {
        let dir = self.path().join(SCHEMA_DIR);
        fs::create_dir_all(&dir).expect("failed to create schema dir");
        fs::write(dir.join(format!("{}.toml", package)), text).expect("failed to write schema");
        self
    }

    pub fn expectation_path(&self, program_id: &str, extension: &str) -> PathBuf {
        self.path().join(format!("{}.pp.{}", program_id, extension))
    }

    pub fn read_expectation(&self, program_id: &str, extension: &str) -> Option<Vec<u8>> {
        fs::read(self.expectation_path(program_id, extension)).ok()
    }

    pub fn harness(&self, cases: Vec<TestCase>, mode: RunMode) -> Harness {
        let host = PackageCache::load(self.path()).expect("failed to load schemas");
        Harness::new(
            Registry::new(cases),
            FixtureStore::new(self.path(), "pp"),
            Box::new(host),
            mode,
        )
    }
}

/// Copy the shipped catalogue into a temporary root so record mode can
/// write next to it
pub fn copy_testdata() -> FixtureDir {
    let fixture = FixtureDir {
        dir: tempfile::tempdir().expect("failed to create temp dir"),
    };
    let testdata = testdata_root();
    for sub in ["", SCHEMA_DIR] {
        let from = testdata.join(sub);
        let to = fixture.path().join(sub);
        fs::create_dir_all(&to).expect("failed to create dir");
        for entry in fs::read_dir(&from).expect("failed to read testdata") {
            let path = entry.expect("dir entry").path();
            if path.is_file() {
                fs::copy(&path, to.join(path.file_name().expect("file name")))
                    .expect("failed to copy fixture");
            }
        }
    }
    fixture
}

pub fn testdata_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/testdata")
}
