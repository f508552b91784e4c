//! Integration tests for the control-flow combinators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use inquest::argument::{
    all, at_least_one_of, at_property, check, new_argument, sequentially, string_property, when,
    ValidatorArgument,
};
use inquest::constraint::{has_min_length, is_not_blank};
use inquest::{arguments, code, Error, ValidationContext, Validator, ViolationList};

fn validate(arguments: &[Arc<dyn inquest::Argument>]) -> Result<(), Error> {
    Validator::new().validate(&ValidationContext::background(), arguments)
}

/// An argument that counts its runs and reports one violation unless `passes`.
fn counted(counter: &Arc<AtomicUsize>, passes: bool) -> ValidatorArgument {
    let counter = Arc::clone(counter);
    new_argument(move |_ctx, validator| {
        counter.fetch_add(1, Ordering::SeqCst);
        if passes {
            Ok(ViolationList::new())
        } else {
            Ok(validator.build_violation(code::NOT_VALID, "failed").create().into())
        }
    })
}

#[test]
fn test_sequential_skips_remaining_arguments() {
    let runs = Arc::new(AtomicUsize::new(0));
    let err = validate(&arguments![sequentially(arguments![
        counted(&runs, true),
        counted(&runs, false),
        counted(&runs, false),
    ])])
    .unwrap_err();

    assert_eq!(err.violations().unwrap().len(), 1);
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn test_sequential_runs_everything_when_all_pass() {
    let runs = Arc::new(AtomicUsize::new(0));
    assert!(validate(&arguments![sequentially(arguments![
        counted(&runs, true),
        counted(&runs, true),
    ])])
    .is_ok());
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn test_at_least_one_of_stops_at_first_pass() {
    let runs = Arc::new(AtomicUsize::new(0));
    assert!(validate(&arguments![at_least_one_of(arguments![
        counted(&runs, false),
        counted(&runs, true),
        counted(&runs, false),
    ])])
    .is_ok());
    assert_eq!(runs.load(Ordering::SeqCst), 2);
}

#[test]
fn test_at_least_one_of_returns_union_when_all_fail() {
    let err = validate(&arguments![at_least_one_of(arguments![
        string_property("phone", "").with(is_not_blank()),
        string_property("email", "").with(is_not_blank()),
    ])])
    .unwrap_err();

    let paths: Vec<String> = err
        .violations()
        .unwrap()
        .iter()
        .map(|v| v.property_path().to_string())
        .collect();
    assert_eq!(paths, vec!["phone", "email"]);
}

#[test]
fn test_all_collects_in_declaration_order() {
    let err = validate(&arguments![all(arguments![
        string_property("first", "").with(is_not_blank()),
        check(true),
        string_property("second", "x").with(has_min_length(2)),
    ])])
    .unwrap_err();

    let violations = err.violations().unwrap();
    assert_eq!(violations.len(), 2);
    assert!(violations.first().unwrap().is(&code::IS_BLANK));
    assert!(violations.last().unwrap().is(&code::TOO_SHORT));
}

#[test]
fn test_nested_combinator_paths() {
    let err = validate(&arguments![at_property(
        "order",
        arguments![all(arguments![sequentially(arguments![
            string_property("reference", "").with(is_not_blank()),
        ])])
        .at_property("lines")
        .at_index(3)],
    )])
    .unwrap_err();

    let violations = err.violations().unwrap();
    assert_eq!(
        violations.first().unwrap().property_path().to_string(),
        "order.lines[3].reference"
    );
}

#[test]
fn test_when_condition_is_fixed_at_construction() {
    let runs = Arc::new(AtomicUsize::new(0));
    let result = validate(&arguments![when(false)
        .then(arguments![counted(&runs, false)])
        .else_(arguments![counted(&runs, true)])]);

    assert!(result.is_ok());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[test]
fn test_fault_in_sequence_is_returned_unchanged() {
    let runs = Arc::new(AtomicUsize::new(0));
    let fault = new_argument(|_ctx, validator| {
        Err(validator
            .create_constraint_error("CustomConstraint", "misconfigured")
            .into())
    })
    .at_property("field");

    let err = validate(&arguments![
        check(false),
        sequentially(arguments![fault, counted(&runs, false)]),
        counted(&runs, false),
    ])
    .unwrap_err();

    assert!(err.is_fault());
    assert_eq!(
        err.to_string(),
        r#"validate by CustomConstraint at path "field": misconfigured"#
    );
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}
