//! Integration tests for parallel argument execution.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use inquest::argument::{
    all, async_, check, new_argument, number_property, sequentially, string_property,
};
use inquest::constraint::{is_not_blank, is_positive};
use inquest::{arguments, Argument, Error, ValidationContext, Validator, ViolationList};

fn validate(arguments: &[Arc<dyn Argument>]) -> Result<(), Error> {
    Validator::new().validate(&ValidationContext::background(), arguments)
}

fn sorted_paths(err: &Error) -> Vec<String> {
    let mut paths: Vec<String> = err
        .violations()
        .unwrap()
        .iter()
        .map(|v| v.property_path().to_string())
        .collect();
    paths.sort();
    paths
}

#[test]
fn test_async_joins_violations_from_every_task() {
    let err = validate(&arguments![async_(arguments![
        string_property("name", "").with(is_not_blank()),
        number_property("age", -3).with(is_positive()),
        check(true).at_property("terms"),
    ])
    .at_property("user")])
    .unwrap_err();

    assert_eq!(sorted_paths(&err), vec!["user.age", "user.name"]);
}

#[test]
fn test_async_inside_sequence_counts_as_one_argument() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let after = new_argument(move |_ctx, _validator| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(ViolationList::new())
    });

    let err = validate(&arguments![sequentially(arguments![
        async_(arguments![check(false).at_index(0), check(false).at_index(1)]),
        after,
    ])])
    .unwrap_err();

    assert_eq!(sorted_paths(&err), vec!["[0]", "[1]"]);
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[test]
fn test_nested_async() {
    let err = validate(&arguments![async_(arguments![
        async_(arguments![check(false).at_index(0), check(false).at_index(1)])
            .at_property("left"),
        async_(arguments![check(false).at_index(0)]).at_property("right"),
    ])])
    .unwrap_err();

    assert_eq!(sorted_paths(&err), vec!["left[0]", "left[1]", "right[0]"]);
}

#[test]
fn test_first_fault_is_returned_after_all_tasks_finish() {
    let mut tasks: Vec<Arc<dyn Argument>> = (0..32)
        .map(|i| {
            Arc::new(all(arguments![
                check(false).at_index(i),
                check(true).at_index(i),
                check(false).at_index(i),
            ])) as Arc<dyn Argument>
        })
        .collect();
    tasks.push(Arc::new(new_argument(|_ctx, validator| {
        Err(validator
            .create_constraint_error("LookupConstraint", "lookup table missing")
            .into())
    })));

    let err = validate(&arguments![async_(tasks)]).unwrap_err();
    match err {
        Error::Constraint(fault) => {
            assert_eq!(fault.constraint_name, "LookupConstraint");
            assert_eq!(fault.description, "lookup table missing");
        }
        other => panic!("expected constraint fault, got {:?}", other),
    }
}

#[test]
fn test_tasks_see_a_live_context() {
    let cancelled = Arc::new(AtomicUsize::new(0));
    let tasks: Vec<Arc<dyn Argument>> = (0..8)
        .map(|_| {
            let cancelled = Arc::clone(&cancelled);
            Arc::new(new_argument(move |ctx, _validator| {
                if ctx.is_cancelled() {
                    cancelled.fetch_add(1, Ordering::SeqCst);
                }
                Ok(ViolationList::new())
            })) as Arc<dyn Argument>
        })
        .collect();

    assert!(validate(&arguments![async_(tasks)]).is_ok());
    assert_eq!(cancelled.load(Ordering::SeqCst), 0);
}

#[test]
fn test_cancelled_context_stops_async() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&runs);
    let task = new_argument(move |_ctx, _validator| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(ViolationList::new())
    });

    let (ctx, handle) = ValidationContext::background().with_cancel();
    drop(handle);

    let result = Validator::new().validate(&ctx, &arguments![async_(arguments![task])]);
    assert!(matches!(result, Err(Error::Cancelled)));
    assert_eq!(runs.load(Ordering::SeqCst), 0);
}

#[test]
fn test_empty_async_passes() {
    assert!(validate(&arguments![async_(Vec::new())]).is_ok());
}
