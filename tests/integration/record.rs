//! Record mode runs
//!
//! Writing expectations, and verifying what was recorded

use std::fs;

use progtest::{CaseFailure, FixtureError, Outcome, RunError, RunMode, TestCase};

use crate::common::*;

#[test]
fn record_creates_missing_expectation() {
    let fixture = FixtureDir::new();
    fixture.source("alpha", CLEAN_SOURCE);
    assert!(fixture.read_expectation("alpha", "go").is_none());

    let report = fixture
        .harness(vec![TestCase::new("alpha", "Alpha")], RunMode::Record)
        .run_all("go", &go_main)
        .unwrap();

    assert!(matches!(report.outcome("alpha"), Some(Outcome::Recorded)));
    assert_eq!(report.recorded(), 1);
    assert!(report.is_success());
    assert_eq!(
        fixture.read_expectation("alpha", "go").as_deref(),
        Some(&b"package main\n"[..])
    );
}

#[test]
fn record_overwrites_stale_expectation() {
    let fixture = FixtureDir::new();
    fixture
        .source("alpha", CLEAN_SOURCE)
        .expectation("alpha", "go", "package stale\n");

    fixture
        .harness(vec![TestCase::new("alpha", "Alpha")], RunMode::Record)
        .run_all("go", &go_main)
        .unwrap();

    assert_eq!(
        fixture.read_expectation("alpha", "go").as_deref(),
        Some(&b"package main\n"[..])
    );
}

#[test]
fn record_then_verify_passes() {
    let fixture = FixtureDir::new();
    fixture
        .source("alpha", CLEAN_SOURCE)
        .source("beta", "local greeting = \"hello\"\noutput message = greeting\n");
    let cases = || vec![TestCase::new("alpha", "Alpha"), TestCase::new("beta", "Beta")];

    for language in ["python", "nodejs", "go", "dotnet"] {
        let recorded = fixture
            .harness(cases(), RunMode::Record)
            .run_all(language, &listing)
            .unwrap();
        assert_eq!(recorded.recorded(), 2, "{}", recorded);

        let verified = fixture
            .harness(cases(), RunMode::Verify)
            .run_all(language, &listing)
            .unwrap();
        assert_eq!(verified.passed(), 2, "{}", verified);
    }

    assert_eq!(
        fs::read_to_string(fixture.expectation_path("beta", "cs")).unwrap(),
        "// beta\nlocal variable greeting\noutput message\n"
    );
}

#[test]
fn record_does_not_write_failed_cases() {
    let fixture = FixtureDir::new();
    fixture
        .source("unbound", UNBOUND_SOURCE)
        .source("alpha", CLEAN_SOURCE);

    let report = fixture
        .harness(
            vec![TestCase::new("unbound", "Unbound"), TestCase::new("alpha", "Alpha")],
            RunMode::Record,
        )
        .run_all("nodejs", &go_main)
        .unwrap();

    assert!(matches!(
        report.outcome("unbound"),
        Some(Outcome::Failed(CaseFailure::Hard(_)))
    ));
    // A missing entry file is never recorded as an empty expectation
    assert!(matches!(
        report.outcome("alpha"),
        Some(Outcome::Failed(CaseFailure::MissingEntryFile { .. }))
    ));
    assert!(fixture.read_expectation("unbound", "ts").is_none());
    assert!(fixture.read_expectation("alpha", "ts").is_none());
}

#[test]
fn record_write_failure_aborts_run() {
    let fixture = FixtureDir::new();
    fixture
        .source("alpha", CLEAN_SOURCE)
        .source("beta", CLEAN_SOURCE);
    // A directory where the expectation file should go
    fs::create_dir(fixture.expectation_path("alpha", "go")).unwrap();
    let generator = Counting::new(go_main);

    let err = fixture
        .harness(
            vec![TestCase::new("alpha", "Alpha"), TestCase::new("beta", "Beta")],
            RunMode::Record,
        )
        .run_all("go", &generator)
        .unwrap_err();

    match err {
        RunError::Record { program_id, source } => {
            assert_eq!(program_id, "alpha");
            assert!(matches!(source, FixtureError::Write { .. }));
        }
        other => panic!("expected record error, got {:?}", other),
    }
    assert_eq!(generator.calls(), 1);
    assert!(fixture.read_expectation("beta", "go").is_none());
}
