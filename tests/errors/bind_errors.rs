//! Binding error tests
//!
//! Schema lookups, name resolution, type checks and dependency cycles

use crate::common::*;

// ============================================================================
// Schema Errors
// ============================================================================

#[test]
fn unknown_resource_type() {
    assert_error_contains(UNBOUND_SOURCE, "unknown resource type 'test:index:Missing' at 2:17");
}

#[test]
fn malformed_resource_token() {
    assert_error_contains(
        "resource b \"Bucket\" {\n    name = \"x\"\n}",
        "invalid resource type token 'Bucket'",
    );
}

#[test]
fn missing_required_property() {
    assert_error_contains(
        "resource b \"test:index:Bucket\" {\n    size = 1\n}",
        "missing required property 'name' on resource 'b'",
    );
}

#[test]
fn unknown_property() {
    assert_error_contains(
        "resource b \"test:index:Bucket\" {\n    name = \"x\"\n    colour = \"red\"\n}",
        "unknown property 'colour' for resource type 'test:index:Bucket' at 3:5",
    );
}

#[test]
fn unknown_resource_attribute() {
    assert_error_contains(
        "resource b \"test:index:Bucket\" { name = \"x\" }\noutput o = b.endpoint",
        "resource 'b' of type 'test:index:Bucket' has no attribute 'endpoint'",
    );
}

#[test]
fn unknown_resource_option() {
    let source = "resource b \"test:index:Bucket\" {\n    name = \"x\"\n    options {\n        deleteBeforeReplace = true\n    }\n}";
    assert_error_contains(source, "unknown resource option 'deleteBeforeReplace'");
    assert_error_contains(source, "supported options: protect, dependsOn, parent, provider, ignoreChanges");
}

#[test]
fn unknown_invoke_argument() {
    assert_error_contains(
        "local v = invoke(\"test:index:lookup\", { name = \"k\" })",
        "unknown argument 'name' for function 'test:index:lookup'",
    );
}

// ============================================================================
// Type Errors
// ============================================================================

#[test]
fn property_type_mismatch() {
    assert_error_contains(
        "resource b \"test:index:Bucket\" {\n    name = 42\n}",
        "cannot assign int to property 'name' of type string at 2:12",
    );
}

#[test]
fn config_default_type_mismatch() {
    assert_error_contains(
        "config count \"int\" { default = true }\noutput c = count",
        "default value for 'count' must be int, found bool",
    );
}

#[test]
fn builtin_arity() {
    assert_error_contains("local a = toJSON(1, 2)", "function 'toJSON' expects 1 argument(s), found 2");
}

// ============================================================================
// Resolution Errors
// ============================================================================

#[test]
fn undeclared_name() {
    assert_error_contains("output o = nothing", "undeclared name 'nothing' at 1:12");
}

#[test]
fn duplicate_declaration() {
    assert_error_contains("local a = 1\nconfig a \"string\"", "duplicate declaration 'a' at 2:8");
}

#[test]
fn circular_reference() {
    assert_error_contains(
        "local a = c\nlocal b = 1\nlocal c = [a, b]",
        "circular reference between a, c",
    );
}

#[test]
fn self_reference_is_a_cycle() {
    assert_error_contains("local a = [a]", "circular reference between a");
}

// ============================================================================
// Warnings
// ============================================================================

#[test]
fn unused_config_is_only_a_warning() {
    let (_, diagnostics) = check_success(CLEAN_SOURCE.replace("name = prefix", "name = \"x\"").as_str());
    assert!(!diagnostics.has_errors());
    assert_eq!(
        diagnostics.to_string(),
        "warning: config variable 'prefix' is never used"
    );
}

#[test]
fn clean_source_has_no_diagnostics() {
    let (program, diagnostics) = check_success(CLEAN_SOURCE);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {}", diagnostics);
    let names: Vec<&str> = program.nodes.iter().map(|n| n.name()).collect();
    assert_eq!(names, vec!["prefix", "bucket", "arn"]);
}
