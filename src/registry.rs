//! Test case registry
//!
//! Every case runs for every language unless the case lists the language
//! as skipped, or as tolerating "not yet implemented" diagnostics. The
//! registry is a sparse case x language matrix over those two sets.

use rustc_hash::FxHashSet as HashSet;

/// How a case runs for one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    Run,
    Skip,
    /// Run, discarding "not yet implemented" diagnostics first
    TolerateNyi,
}

/// One fixture program
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Base name of the fixture files, unique within a registry
    pub program_id: String,
    pub description: String,
    pub skip: HashSet<String>,
    pub tolerate_nyi: HashSet<String>,
}

impl TestCase {
    pub fn new(program_id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            program_id: program_id.into(),
            description: description.into(),
            skip: HashSet::default(),
            tolerate_nyi: HashSet::default(),
        }
    }

    pub fn skip<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip.extend(languages.into_iter().map(Into::into));
        self
    }

    pub fn tolerate_nyi<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tolerate_nyi.extend(languages.into_iter().map(Into::into));
        self
    }

    /// Skip wins when a language is in both sets
    pub fn mode_for(&self, language: &str) -> CaseMode {
        if self.skip.contains(language) {
            CaseMode::Skip
        } else if self.tolerate_nyi.contains(language) {
            CaseMode::TolerateNyi
        } else {
            CaseMode::Run
        }
    }
}

/// Ordered set of test cases. Order only affects reporting.
#[derive(Debug, Clone)]
pub struct Registry {
    cases: Vec<TestCase>,
}

impl Registry {
    /// # Panics
    ///
    /// Panics if two cases share a program id.
    pub fn new(cases: Vec<TestCase>) -> Self {
        let mut seen = HashSet::default();
        for case in &cases {
            assert!(
                seen.insert(case.program_id.as_str()),
                "duplicate test case program id {:?}",
                case.program_id
            );
        }
        Self { cases }
    }

    /// The catalogue of programs shipped under `tests/testdata`
    pub fn builtin() -> Self {
        Self::new(vec![
            TestCase::new("aws-s3-folder", "AWS S3 Folder").tolerate_nyi(["python", "nodejs", "dotnet"]),
            TestCase::new("aws-eks", "AWS EKS"),
            TestCase::new("aws-fargate", "AWS Fargate"),
            TestCase::new("aws-s3-logging", "AWS S3 with logging"),
            TestCase::new("aws-webserver", "AWS Webserver"),
            TestCase::new("azure-native", "Azure Native").skip(["go"]),
            TestCase::new("azure-sa", "Azure SA"),
            TestCase::new("kubernetes-operator", "K8s Operator"),
            TestCase::new("kubernetes-pod", "K8s Pod"),
            TestCase::new("kubernetes-template", "K8s Template"),
            TestCase::new("random-pet", "Random Pet"),
            TestCase::new("resource-options", "Resource Options"),
            TestCase::new("secret", "Secret"),
            TestCase::new("functions", "Functions"),
        ])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    pub fn get(&self, program_id: &str) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.program_id == program_id)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
