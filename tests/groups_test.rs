//! Integration tests for validation groups.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use inquest::argument::{check, new_argument, string_property, when_groups, ValidatorArgument};
use inquest::constraint::{has_min_length, is_not_blank};
use inquest::{
    arguments, code, Error, ValidationContext, Validator, ViolationList, DEFAULT_GROUP,
};

fn run(validator: &Validator, arguments: &[Arc<dyn inquest::Argument>]) -> Result<(), Error> {
    validator.validate(&ValidationContext::background(), arguments)
}

#[test]
fn test_group_matrix() {
    let plain = Validator::new();
    let create = Validator::new().with_groups(["create"]);
    let default_and_create = Validator::new().with_groups([DEFAULT_GROUP, "create"]);

    let none: [&str; 0] = [];
    assert!(plain.is_applied_for_groups(&none));
    assert!(plain.is_applied_for_groups(&[DEFAULT_GROUP]));
    assert!(!plain.is_applied_for_groups(&["create"]));

    assert!(!create.is_applied_for_groups(&none));
    assert!(create.is_applied_for_groups(&["create", "update"]));
    assert!(!create.is_applied_for_groups(&["update"]));

    assert!(default_and_create.is_applied_for_groups(&none));
    assert!(default_and_create.is_applied_for_groups(&["create"]));
    assert!(default_and_create.is_ignored_for_groups(&["update"]));
}

#[test]
fn test_constraints_follow_active_groups() {
    let arguments = arguments![
        string_property("password", "").with(is_not_blank().when_groups(["create"])),
        string_property("name", "ab").with(has_min_length(3)),
    ];

    let err = run(&Validator::new(), &arguments).unwrap_err();
    let violations = err.violations().unwrap();
    assert_eq!(violations.len(), 1);
    assert!(violations.is(&code::TOO_SHORT));

    let err = run(&Validator::new().with_groups(["create"]), &arguments).unwrap_err();
    let violations = err.violations().unwrap();
    assert_eq!(violations.len(), 1);
    assert!(violations.is(&code::IS_BLANK));

    let err = run(
        &Validator::new().with_groups([DEFAULT_GROUP, "create"]),
        &arguments,
    )
    .unwrap_err();
    assert_eq!(err.violations().unwrap().len(), 2);
}

#[test]
fn test_checker_groups() {
    let arguments = arguments![check(false).when_groups(["audit"]).at_property("ledger")];

    assert!(run(&Validator::new(), &arguments).is_ok());
    assert!(run(&Validator::new().with_groups(["audit"]), &arguments).is_err());
}

fn counted(runs: &Arc<AtomicUsize>) -> ValidatorArgument {
    let runs = Arc::clone(runs);
    new_argument(move |_ctx, _validator| {
        runs.fetch_add(1, Ordering::SeqCst);
        Ok(ViolationList::new())
    })
}

#[test]
fn test_when_groups_branches() {
    let admin_runs = Arc::new(AtomicUsize::new(0));
    let everyone_runs = Arc::new(AtomicUsize::new(0));
    let arguments = arguments![when_groups(["admin"])
        .then(arguments![counted(&admin_runs)])
        .else_(arguments![counted(&everyone_runs)])];

    run(&Validator::new().with_groups(["admin"]), &arguments).unwrap();
    assert_eq!(admin_runs.load(Ordering::SeqCst), 1);
    assert_eq!(everyone_runs.load(Ordering::SeqCst), 0);

    run(&Validator::new(), &arguments).unwrap();
    assert_eq!(admin_runs.load(Ordering::SeqCst), 1);
    assert_eq!(everyone_runs.load(Ordering::SeqCst), 1);
}

#[test]
fn test_branch_checks_follow_their_own_groups() {
    let arguments = arguments![when_groups(["admin"])
        .then(arguments![
            check(false).at_property("groupless"),
            check(false).when_groups(["admin"]).at_property("admin_only"),
        ])
        .else_(arguments![check(false).at_property("everyone")])];

    let err = run(&Validator::new().with_groups(["admin"]), &arguments).unwrap_err();
    let violations = err.violations().unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations.first().unwrap().property_path().to_string(),
        "admin_only"
    );

    let err = run(&Validator::new(), &arguments).unwrap_err();
    assert_eq!(
        err.violations().unwrap().first().unwrap().property_path().to_string(),
        "everyone"
    );
}

#[test]
fn test_groups_survive_repositioning() {
    let validator = Validator::new().with_groups(["create"]).at_property("user");
    assert_eq!(validator.groups(), ["create".to_string()]);
    assert_eq!(validator.property_path().to_string(), "user");
}
