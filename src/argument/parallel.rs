//! Parallel execution of independent sub-arguments.

use std::sync::Arc;

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, ViolationList};
use crate::path::PathElement;
use crate::validation::ValidationContext;
use crate::validator::Validator;

use super::{impl_argument_builders, Argument, Arguments, ExecutionContext};

/// Runs sub-arguments as parallel tasks sharing one cancellable context.
pub struct AsyncArgument {
    arguments: Arc<[Arc<dyn Argument>]>,
    path: Vec<PathElement>,
    is_ignored: bool,
}

/// Runs every argument as its own task on the rayon pool.
///
/// All tasks share a context derived from the caller's. The first fault to
/// complete cancels that context, which stops sibling tasks before their next
/// registered check, and is returned once every task has finished. Without a
/// fault the violations of all tasks are joined. Their relative order is not
/// specified.
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, ValidationContext, Validator};
/// use inquest::argument::{async_, number_property, string_property};
/// use inquest::constraint::{is_not_blank, is_positive};
///
/// let err = Validator::new()
///     .validate(
///         &ValidationContext::background(),
///         &arguments![async_(arguments![
///             string_property("name", "").with(is_not_blank()),
///             number_property("age", -1).with(is_positive()),
///         ])],
///     )
///     .unwrap_err();
/// assert_eq!(err.violations().unwrap().len(), 2);
/// ```
pub fn async_(arguments: Arguments) -> AsyncArgument {
    AsyncArgument {
        arguments: arguments.into(),
        path: Vec::new(),
        is_ignored: false,
    }
}

impl AsyncArgument {
    impl_argument_builders!();
}

fn run_parallel(
    ctx: &ValidationContext,
    validator: &Validator,
    arguments: &[Arc<dyn Argument>],
) -> Result<ViolationList, Error> {
    let (shared, handle) = ctx.with_cancel();
    let fault: Mutex<Option<Error>> = Mutex::new(None);

    let results: Vec<ViolationList> = arguments
        .par_iter()
        .map(|argument| {
            match ViolationList::from_result(
                validator.validate(&shared, std::slice::from_ref(argument)),
            ) {
                Ok(violations) => violations,
                Err(err) => {
                    let mut first = fault.lock();
                    if first.is_none() {
                        debug!(
                            path = %validator.property_path(),
                            error = %err,
                            "parallel task failed, cancelling siblings"
                        );
                        *first = Some(err);
                        handle.cancel();
                    }
                    ViolationList::new()
                }
            }
        })
        .collect();

    if let Some(err) = fault.into_inner() {
        return Err(err);
    }

    let mut violations = ViolationList::new();
    for found in results {
        violations.join(found);
    }
    Ok(violations)
}

impl Argument for AsyncArgument {
    fn set_up(&self, execution: &mut ExecutionContext) {
        if self.is_ignored {
            return;
        }

        let arguments = Arc::clone(&self.arguments);
        execution.add_validation(
            Arc::new(move |ctx: &ValidationContext, validator: &Validator| {
                run_parallel(ctx, validator, &arguments)
            }),
            &self.path,
        );
    }
}
