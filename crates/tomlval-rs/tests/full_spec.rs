//! End-to-end validation of the sample documents and schemas.

use pretty_assertions::assert_eq;
use serde_json::json;
use tomlval_rs::{Outcome, Schema, Validator, ValueKind};
use tomlval_rs_test_utils::{
    FULL_SPEC_SCHEMA_TOML, FULL_SPEC_TOML, PERSON_TOML, full_spec_schema, glob_schema,
    parse_document, with_functions_schema,
};

fn full_spec() -> toml::Value {
    parse_document(FULL_SPEC_TOML).expect("document")
}

/// Every field of the sample document conforms to the specific schema.
#[test]
fn full_spec_conforms_to_specific_schema() {
    let schema = full_spec_schema().expect("schema");
    let data = full_spec();
    let report = Validator::new(&data, Some(&schema))
        .expect("validator")
        .validate();
    assert!(!report.has_violations(), "{report}");
    assert_eq!(report.get("nested_array.[0].inner.[1].name"), Some(&Outcome::Ok));
    assert_eq!(report.get("array_mixed.[3]"), Some(&Outcome::Ok));
    assert_eq!(report.get("local_time"), Some(&Outcome::Ok));
}

/// Wildcard keys cover the same document.
#[test]
fn full_spec_conforms_to_glob_schema() {
    let schema = glob_schema().expect("schema");
    let data = full_spec();
    let report = Validator::new(&data, Some(&schema))
        .expect("validator")
        .validate();
    assert!(!report.has_violations(), "{report}");
    assert_eq!(report.get("int_hex"), Some(&Outcome::Ok));
    assert_eq!(report.get("datetime_offset"), Some(&Outcome::Ok));
    assert_eq!(report.get("local_date"), Some(&Outcome::Ok));
}

/// The TOML description and the code-built schema agree.
#[test]
fn schema_description_matches_code_schema() {
    let description: toml::Table = toml::from_str(FULL_SPEC_SCHEMA_TOML).expect("toml");
    let described = Schema::from_toml(&description).expect("schema");
    let built = full_spec_schema().expect("schema");
    assert_eq!(described.keys(), built.keys());
    assert_eq!(described.to_string(), built.to_string());
}

/// Breaking fields of the document surfaces each violation in one pass.
#[test]
fn violations_are_collected_in_one_pass() {
    let schema = full_spec_schema().expect("schema");
    let broken = FULL_SPEC_TOML
        .replace("int_positive = 42", "int_positive = \"42\"")
        .replace("bool_true = true\n", "")
        .replace("array_numbers = [1, 2, 3]", "array_numbers = [1, \"2\", 3]");
    let data = parse_document(&broken).expect("document");
    let report = Validator::new(&data, Some(&schema))
        .expect("validator")
        .validate();
    let violations: Vec<String> = report.violations().map(|(path, _)| path.to_string()).collect();
    assert_eq!(
        violations,
        vec!["array_numbers.[1]", "bool_true", "int_positive"]
    );
    assert!(matches!(
        report.get("int_positive"),
        Some(Outcome::TypeMismatch {
            actual: ValueKind::String,
            ..
        })
    ));
}

/// Handlers, wildcards, and the catch-all cooperate on one document.
#[test]
fn with_functions_schema_routes_each_key() {
    let schema = with_functions_schema().expect("schema");
    let data = parse_document(PERSON_TOML).expect("document");
    let report = Validator::new(&data, Some(&schema))
        .expect("validator")
        .validate();
    assert_eq!(report.get("first_name"), Some(&Outcome::Ok));
    assert_eq!(report.get("last_name"), Some(&Outcome::Ok));
    assert_eq!(
        report.get("id"),
        Some(&Outcome::HandlerResult { result: json!(true) })
    );
    assert_eq!(
        report.get("age"),
        Some(&Outcome::HandlerResult { result: json!(true) })
    );
    assert_eq!(
        report.get("nickname"),
        Some(&Outcome::HandlerResult {
            result: json!("invalid-key")
        })
    );
    assert_eq!(
        schema.to_string(),
        "* = lambda\n*_name = str\nage = check_age(value)\nid = check_id(value)"
    );
}

/// A failing handler is reported for its key only.
#[test]
fn with_functions_schema_reports_handler_failure() {
    let schema = with_functions_schema().expect("schema");
    let data = parse_document("first_name = \"Ada\"\nid = \"ada\"\nage = \"old\"\n")
        .expect("document");
    let report = Validator::new(&data, Some(&schema))
        .expect("validator")
        .validate();
    assert_eq!(
        report.get("age"),
        Some(&Outcome::HandlerFailed {
            message: "age must be an integer".to_string()
        })
    );
    assert_eq!(report.get("first_name"), Some(&Outcome::Ok));
}
