//! Verify mode runs
//!
//! Pass, mismatch, tolerance, skip and per-case failure handling

use progtest::pipeline::HardError;
use progtest::verify::Mismatch;
use progtest::{CaseFailure, FixtureError, Outcome, RunError, RunMode, TestCase};

use crate::common::*;

// ============================================================================
// Pass / Mismatch
// ============================================================================

#[test]
fn matching_expectation_passes() {
    let fixture = FixtureDir::new();
    fixture
        .source("alpha", CLEAN_SOURCE)
        .expectation("alpha", "go", "package main\n");

    let report = fixture
        .harness(vec![TestCase::new("alpha", "Alpha")], RunMode::Verify)
        .run_all("go", &go_main)
        .unwrap();

    assert!(matches!(report.outcome("alpha"), Some(Outcome::Passed)));
    assert_eq!(report.passed(), 1);
    report.assert_success();
}

#[test]
fn differing_expectation_fails_with_both_contents() {
    let fixture = FixtureDir::new();
    fixture
        .source("alpha", CLEAN_SOURCE)
        .expectation("alpha", "go", "package other\n");

    let report = fixture
        .harness(vec![TestCase::new("alpha", "Alpha")], RunMode::Verify)
        .run_all("go", &go_main)
        .unwrap();

    match report.outcome("alpha") {
        Some(Outcome::Failed(CaseFailure::Mismatch(Mismatch { expected, actual, diff }))) => {
            assert_eq!(expected, b"package other\n");
            assert_eq!(actual, b"package main\n");
            assert!(diff.contains("-package other"));
            assert!(diff.contains("+package main"));
        }
        other => panic!("expected mismatch, got {:?}", other),
    }
    assert!(!report.is_success());
    // Verify mode never rewrites expectations
    assert_eq!(
        fixture.read_expectation("alpha", "go").as_deref(),
        Some(&b"package other\n"[..])
    );
}

#[test]
#[should_panic(expected = "FAIL     alpha (Alpha)")]
fn assert_success_panics_with_report() {
    let fixture = FixtureDir::new();
    fixture
        .source("alpha", CLEAN_SOURCE)
        .expectation("alpha", "go", "package other\n");

    fixture
        .harness(vec![TestCase::new("alpha", "Alpha")], RunMode::Verify)
        .run_all("go", &go_main)
        .unwrap()
        .assert_success();
}

// ============================================================================
// Diagnostic Tolerance
// ============================================================================

#[test]
fn tolerated_nyi_diagnostics_pass() {
    let fixture = FixtureDir::new();
    fixture
        .source("alpha", CLEAN_SOURCE)
        .expectation("alpha", "py", "import pulumi\n");

    let case = TestCase::new("alpha", "Alpha").tolerate_nyi(["python"]);
    let report = fixture
        .harness(vec![case], RunMode::Verify)
        .run_all("python", &python_with_nyi)
        .unwrap();

    assert!(matches!(report.outcome("alpha"), Some(Outcome::Passed)));
}

#[test]
fn untolerated_nyi_diagnostics_fail() {
    let fixture = FixtureDir::new();
    fixture
        .source("alpha", CLEAN_SOURCE)
        .expectation("alpha", "py", "import pulumi\n");

    // Tolerance for another language does not apply
    let case = TestCase::new("alpha", "Alpha").tolerate_nyi(["nodejs"]);
    let report = fixture
        .harness(vec![case], RunMode::Verify)
        .run_all("python", &python_with_nyi)
        .unwrap();

    match report.outcome("alpha") {
        Some(Outcome::Failed(CaseFailure::Diagnostics { diagnostics })) => {
            assert_eq!(diagnostics.len(), 1);
            assert_eq!(diagnostics.as_slice()[0].summary, "not yet implemented: foo");
        }
        other => panic!("expected diagnostics failure, got {:?}", other),
    }
}

#[test]
fn tolerance_keeps_other_errors() {
    let fixture = FixtureDir::new();
    fixture
        .source("alpha", CLEAN_SOURCE)
        .expectation("alpha", "py", "import pulumi\n");

    let generator = |program: &progtest::Program| {
        python_with_nyi(program).with_diagnostic(progtest::Diagnostic::error("unsupported splat"))
    };
    let case = TestCase::new("alpha", "Alpha").tolerate_nyi(["python"]);
    let report = fixture
        .harness(vec![case], RunMode::Verify)
        .run_all("python", &generator)
        .unwrap();

    match report.outcome("alpha") {
        Some(Outcome::Failed(CaseFailure::Diagnostics { diagnostics })) => {
            let summaries: Vec<&str> = diagnostics.iter().map(|d| d.summary.as_str()).collect();
            assert_eq!(summaries, vec!["unsupported splat"]);
        }
        other => panic!("expected diagnostics failure, got {:?}", other),
    }
}

// ============================================================================
// Skips
// ============================================================================

#[test]
fn skipped_case_never_reaches_the_generator() {
    let fixture = FixtureDir::new();
    // No source fixture: a skipped case must not even look for it
    let generator = Counting::new(go_main);
    let case = TestCase::new("alpha", "Alpha").skip(["go"]);
    let report = fixture
        .harness(vec![case], RunMode::Verify)
        .run_all("go", &generator)
        .unwrap();

    assert!(matches!(report.outcome("alpha"), Some(Outcome::Skipped)));
    assert_eq!(generator.calls(), 0);
    assert_eq!(report.skipped(), 1);
    assert!(report.is_success());
}

#[test]
fn skip_wins_over_tolerance() {
    let fixture = FixtureDir::new();
    let case = TestCase::new("alpha", "Alpha").skip(["go"]).tolerate_nyi(["go"]);
    let report = fixture
        .harness(vec![case], RunMode::Verify)
        .run_all("go", &go_main)
        .unwrap();
    assert!(matches!(report.outcome("alpha"), Some(Outcome::Skipped)));
}

// ============================================================================
// Per-Case Failures
// ============================================================================

#[test]
fn unknown_language_aborts_before_any_case() {
    let fixture = FixtureDir::new();
    fixture.source("alpha", CLEAN_SOURCE);
    let generator = Counting::new(go_main);

    let err = fixture
        .harness(vec![TestCase::new("alpha", "Alpha")], RunMode::Verify)
        .run_all("fortran", &generator)
        .unwrap_err();

    match err {
        RunError::Configuration(e) => assert_eq!(e.language, "fortran"),
        other => panic!("expected configuration error, got {:?}", other),
    }
    assert_eq!(generator.calls(), 0);
}

#[test]
fn missing_source_fails_only_that_case() {
    let fixture = FixtureDir::new();
    fixture
        .source("beta", CLEAN_SOURCE)
        .expectation("beta", "go", "package main\n");

    let report = fixture
        .harness(
            vec![TestCase::new("alpha", "Alpha"), TestCase::new("beta", "Beta")],
            RunMode::Verify,
        )
        .run_all("go", &go_main)
        .unwrap();

    assert!(matches!(
        report.outcome("alpha"),
        Some(Outcome::Failed(CaseFailure::Fixture(FixtureError::Missing { .. })))
    ));
    assert!(matches!(report.outcome("beta"), Some(Outcome::Passed)));
    assert_eq!(report.failures().count(), 1);
    assert_eq!(
        report.failures().next().map(|(case, _)| case.program_id.as_str()),
        Some("alpha")
    );
}

#[test]
fn missing_expectation_fails_before_generation() {
    let fixture = FixtureDir::new();
    fixture.source("alpha", CLEAN_SOURCE);
    let generator = Counting::new(go_main);

    let report = fixture
        .harness(vec![TestCase::new("alpha", "Alpha")], RunMode::Verify)
        .run_all("go", &generator)
        .unwrap();

    assert!(matches!(
        report.outcome("alpha"),
        Some(Outcome::Failed(CaseFailure::Fixture(FixtureError::Missing { .. })))
    ));
    assert_eq!(generator.calls(), 0);
    assert!(fixture.read_expectation("alpha", "go").is_none());
}

#[test]
fn parse_and_bind_failures_are_hard_errors() {
    let fixture = FixtureDir::new();
    fixture
        .source("broken", UNPARSABLE_SOURCE)
        .expectation("broken", "go", "package main\n")
        .source("unbound", UNBOUND_SOURCE)
        .expectation("unbound", "go", "package main\n");
    let generator = Counting::new(go_main);

    let report = fixture
        .harness(
            vec![TestCase::new("broken", "Broken"), TestCase::new("unbound", "Unbound")],
            RunMode::Verify,
        )
        .run_all("go", &generator)
        .unwrap();

    match report.outcome("broken") {
        Some(Outcome::Failed(CaseFailure::Hard(HardError::ParseFailed { name, message }))) => {
            assert_eq!(name, "broken");
            assert!(message.contains("at 1:17"), "message was {}", message);
        }
        other => panic!("expected parse failure, got {:?}", other),
    }
    match report.outcome("unbound") {
        Some(Outcome::Failed(CaseFailure::Hard(HardError::BindFailed { diagnostics, .. }))) => {
            assert!(diagnostics.has_errors());
        }
        other => panic!("expected bind failure, got {:?}", other),
    }
    assert_eq!(generator.calls(), 0);
}

#[test]
fn generator_error_fails_the_case() {
    let fixture = FixtureDir::new();
    fixture
        .source("alpha", CLEAN_SOURCE)
        .expectation("alpha", "go", "package main\n");

    let report = fixture
        .harness(vec![TestCase::new("alpha", "Alpha")], RunMode::Verify)
        .run_all("go", &failing)
        .unwrap();

    match report.outcome("alpha") {
        Some(Outcome::Failed(CaseFailure::Generator { error, diagnostics })) => {
            assert_eq!(error.message, "template exploded");
            assert!(diagnostics.is_empty());
        }
        other => panic!("expected generator failure, got {:?}", other),
    }
}

#[test]
fn generator_error_reports_diagnostics() {
    let fixture = FixtureDir::new();
    fixture
        .source("alpha", CLEAN_SOURCE)
        .expectation("alpha", "go", "package main\n");

    let report = fixture
        .harness(vec![TestCase::new("alpha", "Alpha")], RunMode::Verify)
        .run_all("go", &failing_with_diagnostic)
        .unwrap();

    match report.outcome("alpha") {
        Some(Outcome::Failed(CaseFailure::Generator { diagnostics, .. })) => {
            assert_eq!(diagnostics.len(), 1);
        }
        other => panic!("expected generator failure, got {:?}", other),
    }
    let text = report.to_string();
    assert!(text.contains("generator failed: boom"), "report was:\n{}", text);
    assert!(text.contains("unsupported range expression"), "report was:\n{}", text);
}

#[test]
fn missing_entry_file_fails() {
    let fixture = FixtureDir::new();
    fixture
        .source("alpha", CLEAN_SOURCE)
        .expectation("alpha", "ts", "export {}\n");

    // go_main only produces main.go
    let report = fixture
        .harness(vec![TestCase::new("alpha", "Alpha")], RunMode::Verify)
        .run_all("nodejs", &go_main)
        .unwrap();

    match report.outcome("alpha") {
        Some(Outcome::Failed(CaseFailure::MissingEntryFile { entry_file, found })) => {
            assert_eq!(entry_file, "index.ts");
            assert_eq!(found, &vec!["main.go".to_string()]);
        }
        other => panic!("expected missing entry file, got {:?}", other),
    }
}

// ============================================================================
// Repeatability
// ============================================================================

#[test]
fn verify_twice_gives_identical_outcomes() {
    let fixture = FixtureDir::new();
    fixture
        .source("alpha", CLEAN_SOURCE)
        .expectation("alpha", "go", "package main\n")
        .source("beta", CLEAN_SOURCE)
        .expectation("beta", "go", "package beta\n")
        .source("gamma", UNBOUND_SOURCE);

    let harness = fixture.harness(
        vec![
            TestCase::new("alpha", "Alpha"),
            TestCase::new("beta", "Beta"),
            TestCase::new("gamma", "Gamma"),
            TestCase::new("delta", "Delta").skip(["go"]),
        ],
        RunMode::Verify,
    );

    let first = harness.run_all("go", &go_main).unwrap();
    let second = harness.run_all("go", &go_main).unwrap();
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(
        (first.passed(), first.failed(), first.skipped(), first.recorded()),
        (1, 2, 1, 0)
    );
}
