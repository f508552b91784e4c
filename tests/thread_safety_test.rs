//! Tests for sharing validators, arguments and contexts across threads.

use std::sync::Arc;
use std::thread;

use inquest::argument::{number_property, string_property};
use inquest::constraint::{has_min_length, is_positive};
use inquest::{arguments, Arguments, ValidationContext, Validator};

#[test]
fn test_concurrent_validation() {
    let validator = Arc::new(Validator::new().with_groups(["default"]));

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                let result = validator.validate(
                    &ValidationContext::background(),
                    &arguments![
                        string_property("name", format!("User{}", i)).with(has_min_length(5)),
                        number_property("age", 20 + i).with(is_positive()),
                    ],
                );
                assert!(result.is_ok());
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_shared_arguments() {
    let arguments: Arc<Arguments> = Arc::new(arguments![
        string_property("code", "ab").with(has_min_length(3)),
    ]);

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let arguments = Arc::clone(&arguments);
            thread::spawn(move || {
                let err = Validator::new()
                    .at_index(i)
                    .validate(&ValidationContext::background(), &arguments)
                    .unwrap_err();
                let violations = err.violations().unwrap();
                assert_eq!(
                    violations.first().unwrap().property_path().to_string(),
                    format!("[{}].code", i)
                );
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_cancel_from_another_thread() {
    let (ctx, handle) = ValidationContext::background().with_cancel();

    thread::spawn(move || handle.cancel()).join().unwrap();

    assert!(ctx.is_cancelled());
    let result = Validator::new().validate(
        &ctx,
        &arguments![string_property("name", "").with(has_min_length(1))],
    );
    assert!(matches!(result, Err(inquest::Error::Cancelled)));
}
