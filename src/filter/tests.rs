//! Tests for the filter module

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn email_or_slack_us() -> FilterSet {
    FilterSet::new(vec![
        FilterSpec::new().with("service", "email"),
        FilterSpec::new()
            .with("service", "slack")
            .with("region", "us"),
    ])
}

// ============================================================================
// Degenerate sets
// ============================================================================

#[test]
fn test_empty_set_needs_no_filtering() {
    let compiled = FilterCompiler::compile(&FilterSet::none());
    assert!(!compiled.filter_required);
    assert!(compiled.predicate.matches(&json!({"anything": 1})));
}

#[test]
fn test_all_empty_specs_need_no_filtering() {
    let set = FilterSet::new(vec![FilterSpec::new(), FilterSpec::new()]);
    let compiled = FilterCompiler::compile(&set);
    assert!(!compiled.filter_required);
    assert!(compiled.matches(&json!({"service": "x"})));
}

#[test]
fn test_empty_spec_is_skipped_among_others() {
    let set = FilterSet::new(vec![
        FilterSpec::new(),
        FilterSpec::new().with("service", "email"),
    ]);
    let compiled = FilterCompiler::compile(&set);
    assert!(compiled.filter_required);
    assert!(compiled.matches(&json!({"service": "email"})));
    assert!(!compiled.matches(&json!({"service": "slack"})));
}

// ============================================================================
// OR of ANDs
// ============================================================================

#[test_case(json!({"service": "email"}), true; "first clause")]
#[test_case(json!({"service": "email", "region": "eu"}), true; "first clause ignores extra fields")]
#[test_case(json!({"service": "slack", "region": "us"}), true; "second clause")]
#[test_case(json!({"service": "slack", "region": "eu"}), false; "second clause partial")]
#[test_case(json!({"service": "slack"}), false; "missing field")]
#[test_case(json!({"region": "us"}), false; "no service")]
#[test_case(json!({"service": "Email"}), false; "case sensitive")]
fn test_disjunction_of_conjunctions(item: serde_json::Value, expected: bool) {
    let compiled = FilterCompiler::compile(&email_or_slack_us());
    assert_eq!(compiled.predicate.matches(&item), expected);
}

// ============================================================================
// String coercion
// ============================================================================

#[test_case(json!({"id": 1}), json!("1"), true; "number field vs string expectation")]
#[test_case(json!({"id": "1"}), json!(1), true; "string field vs number expectation")]
#[test_case(json!({"paused": true}), json!("true"), true; "bool field")]
#[test_case(json!({"paused": false}), json!(true), false; "bool mismatch")]
#[test_case(json!({"note": null}), json!("null"), true; "null field")]
#[test_case(json!({"id": 1.5}), json!("1.5"), true; "float field")]
#[test_case(json!({"tags": ["a"]}), json!("a"), false; "array field never matches")]
fn test_string_coercion(item: serde_json::Value, expected: serde_json::Value, matches: bool) {
    let field = item.as_object().unwrap().keys().next().unwrap().clone();
    let set = FilterSet::single(FilterSpec::new().with(field, expected));
    let compiled = FilterCompiler::compile(&set);
    assert_eq!(compiled.matches(&item), matches);
}

#[test]
fn test_non_scalar_expectation_degrades_to_no_match() {
    let set = FilterSet::single(FilterSpec::new().with("config", json!({"a": 1})));
    let compiled = FilterCompiler::compile(&set);
    assert!(compiled.filter_required);
    assert!(!compiled.matches(&json!({"config": {"a": 1}})));
}

#[test]
fn test_non_object_item_never_matches() {
    let set = FilterSet::single(FilterSpec::new().with("id", "1"));
    let compiled = FilterCompiler::compile(&set);
    assert!(!compiled.matches(&json!("1")));
    assert!(!compiled.matches(&json!([1])));
}

// ============================================================================
// Read-only compilation
// ============================================================================

#[test]
fn test_compile_does_not_consume_set() {
    let set = email_or_slack_us();
    let before = set.clone();

    let first = FilterCompiler::compile(&set);
    let second = FilterCompiler::compile(&set);

    assert_eq!(set, before);
    let item = json!({"service": "email"});
    assert_eq!(first.matches(&item), second.matches(&item));
}

#[test]
fn test_filter_set_deserializes_from_json() {
    let set: FilterSet =
        serde_json::from_str(r#"[{}, {"service": "email", "paused": false}]"#).unwrap();
    assert_eq!(set.len(), 2);
    assert!(set.specs()[0].is_empty());

    let compiled = FilterCompiler::compile(&set);
    assert!(compiled.matches(&json!({"service": "email", "paused": false})));
    assert!(!compiled.matches(&json!({"service": "email", "paused": true})));
}

#[test]
fn test_predicate_combinators() {
    let item = json!({"a": "1"});
    assert!(Predicate::all(vec![]).matches(&item));
    assert!(!Predicate::any(vec![]).matches(&item));
    assert!(Predicate::field_eq("a", "1").matches(&item));
    assert!(!Predicate::field_eq("b", "1").matches(&item));
}
