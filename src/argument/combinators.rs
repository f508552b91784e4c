//! Control-flow combinators over nested arguments.
//!
//! Each combinator registers a single check at its own path. When the check
//! runs, it validates its sub-arguments with the positioned validator and
//! decides, according to its policy, which results to keep:
//!
//! - [`sequentially`]: stop at the first sub-argument that reports violations
//! - [`all`]: run every sub-argument and join all violations
//! - [`at_least_one_of`]: succeed as soon as one sub-argument passes
//! - [`when`]: pick one of two argument sets from a condition
//! - [`when_groups`]: pick one of two argument sets from the active groups
//!
//! A fault from any sub-argument aborts the combinator and is returned as-is.
//!
//! # Example
//!
//! ```rust
//! use inquest::{arguments, ValidationContext, Validator};
//! use inquest::argument::{sequentially, string_property};
//! use inquest::constraint::{has_min_length, is_not_blank};
//!
//! let result = Validator::new().validate(
//!     &ValidationContext::background(),
//!     &arguments![sequentially(arguments![
//!         string_property("name", "").with(is_not_blank()),
//!         string_property("name", "").with(has_min_length(3)),
//!     ])],
//! );
//!
//! // The second argument never runs.
//! assert_eq!(result.unwrap_err().violations().unwrap().len(), 1);
//! ```

use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, ViolationList};
use crate::path::PathElement;
use crate::validation::ValidationContext;
use crate::validator::Validator;

use super::{impl_argument_builders, impl_path_builders, Argument, Arguments, ExecutionContext};

type Shared = Arc<[Arc<dyn Argument>]>;

fn run_one(
    ctx: &ValidationContext,
    validator: &Validator,
    argument: &Arc<dyn Argument>,
) -> Result<ViolationList, Error> {
    ViolationList::from_result(validator.validate(ctx, std::slice::from_ref(argument)))
}

fn run_all(
    ctx: &ValidationContext,
    validator: &Validator,
    arguments: &[Arc<dyn Argument>],
) -> Result<ViolationList, Error> {
    ViolationList::from_result(validator.validate(ctx, arguments))
}

/// Runs sub-arguments in order until one reports violations.
pub struct SequentialArgument {
    arguments: Shared,
    path: Vec<PathElement>,
    is_ignored: bool,
}

/// Runs `arguments` one at a time, stopping at the first that reports
/// violations. Only that argument's violations are returned.
pub fn sequentially(arguments: Arguments) -> SequentialArgument {
    SequentialArgument {
        arguments: arguments.into(),
        path: Vec::new(),
        is_ignored: false,
    }
}

impl SequentialArgument {
    impl_argument_builders!();
}

impl Argument for SequentialArgument {
    fn set_up(&self, execution: &mut ExecutionContext) {
        if self.is_ignored {
            return;
        }

        let arguments = Arc::clone(&self.arguments);
        execution.add_validation(
            Arc::new(move |ctx: &ValidationContext, validator: &Validator| {
                for (i, argument) in arguments.iter().enumerate() {
                    let violations = run_one(ctx, validator, argument)?;
                    if !violations.is_empty() {
                        trace!(
                            path = %validator.property_path(),
                            position = i,
                            "sequence stopped at first violation"
                        );
                        return Ok(violations);
                    }
                }
                Ok(ViolationList::new())
            }),
            &self.path,
        );
    }
}

/// Runs every sub-argument and joins their violations.
pub struct AllArgument {
    arguments: Shared,
    path: Vec<PathElement>,
    is_ignored: bool,
}

/// Runs all `arguments` and returns the union of their violations.
pub fn all(arguments: Arguments) -> AllArgument {
    AllArgument {
        arguments: arguments.into(),
        path: Vec::new(),
        is_ignored: false,
    }
}

/// Same as [`all`], placed under a property.
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, ValidationContext, Validator};
/// use inquest::argument::{at_property, string_property};
/// use inquest::constraint::is_not_blank;
///
/// let err = Validator::new()
///     .validate(
///         &ValidationContext::background(),
///         &arguments![at_property("address", arguments![
///             string_property("city", "").with(is_not_blank()),
///         ])],
///     )
///     .unwrap_err();
/// let violations = err.violations().unwrap();
/// assert_eq!(violations.first().unwrap().property_path().to_string(), "address.city");
/// ```
pub fn at_property(name: impl Into<String>, arguments: Arguments) -> AllArgument {
    all(arguments).at_property(name)
}

impl AllArgument {
    impl_argument_builders!();
}

impl Argument for AllArgument {
    fn set_up(&self, execution: &mut ExecutionContext) {
        if self.is_ignored {
            return;
        }

        let arguments = Arc::clone(&self.arguments);
        execution.add_validation(
            Arc::new(move |ctx: &ValidationContext, validator: &Validator| {
                run_all(ctx, validator, &arguments)
            }),
            &self.path,
        );
    }
}

/// Passes as soon as one sub-argument passes.
pub struct AtLeastOneOfArgument {
    arguments: Shared,
    path: Vec<PathElement>,
    is_ignored: bool,
}

/// Runs `arguments` in order and passes on the first one without violations;
/// the rest are skipped. If every argument fails, all violations are returned.
pub fn at_least_one_of(arguments: Arguments) -> AtLeastOneOfArgument {
    AtLeastOneOfArgument {
        arguments: arguments.into(),
        path: Vec::new(),
        is_ignored: false,
    }
}

impl AtLeastOneOfArgument {
    impl_argument_builders!();
}

impl Argument for AtLeastOneOfArgument {
    fn set_up(&self, execution: &mut ExecutionContext) {
        if self.is_ignored {
            return;
        }

        let arguments = Arc::clone(&self.arguments);
        execution.add_validation(
            Arc::new(move |ctx: &ValidationContext, validator: &Validator| {
                let mut violations = ViolationList::new();
                for (i, argument) in arguments.iter().enumerate() {
                    let found = run_one(ctx, validator, argument)?;
                    if found.is_empty() {
                        trace!(
                            path = %validator.property_path(),
                            position = i,
                            "alternative passed"
                        );
                        return Ok(ViolationList::new());
                    }
                    violations.join(found);
                }
                Ok(violations)
            }),
            &self.path,
        );
    }
}

/// Chooses between two argument sets from a condition fixed at construction.
pub struct WhenArgument {
    is_true: bool,
    then_arguments: Shared,
    else_arguments: Shared,
    path: Vec<PathElement>,
}

/// Starts a conditional: `then` arguments run if `condition` holds,
/// `else_` arguments otherwise.
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, ValidationContext, Validator};
/// use inquest::argument::{string_property, when};
/// use inquest::constraint::is_not_blank;
///
/// let is_company = false;
/// let result = Validator::new().validate(
///     &ValidationContext::background(),
///     &arguments![when(is_company)
///         .then(arguments![string_property("vat", "").with(is_not_blank())])
///         .else_(arguments![string_property("name", "Ann").with(is_not_blank())])],
/// );
/// assert!(result.is_ok());
/// ```
pub fn when(condition: bool) -> WhenArgument {
    WhenArgument {
        is_true: condition,
        then_arguments: Arc::from(Vec::new()),
        else_arguments: Arc::from(Vec::new()),
        path: Vec::new(),
    }
}

impl WhenArgument {
    impl_path_builders!();

    /// Arguments run when the condition holds.
    pub fn then(mut self, arguments: Arguments) -> Self {
        self.then_arguments = arguments.into();
        self
    }

    /// Arguments run when the condition does not hold.
    pub fn else_(mut self, arguments: Arguments) -> Self {
        self.else_arguments = arguments.into();
        self
    }
}

impl Argument for WhenArgument {
    fn set_up(&self, execution: &mut ExecutionContext) {
        let arguments = if self.is_true {
            Arc::clone(&self.then_arguments)
        } else {
            Arc::clone(&self.else_arguments)
        };
        execution.add_validation(
            Arc::new(move |ctx: &ValidationContext, validator: &Validator| {
                run_all(ctx, validator, &arguments)
            }),
            &self.path,
        );
    }
}

/// Chooses between two argument sets from the validator's active groups.
pub struct WhenGroupsArgument {
    groups: Vec<String>,
    then_arguments: Shared,
    else_arguments: Shared,
    path: Vec<PathElement>,
}

/// Starts a group conditional: `then` arguments run if the validator applies
/// to `groups`, `else_` arguments otherwise.
pub fn when_groups<I, S>(groups: I) -> WhenGroupsArgument
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    WhenGroupsArgument {
        groups: groups.into_iter().map(Into::into).collect(),
        then_arguments: Arc::from(Vec::new()),
        else_arguments: Arc::from(Vec::new()),
        path: Vec::new(),
    }
}

impl WhenGroupsArgument {
    impl_path_builders!();

    /// Arguments run when the groups apply.
    pub fn then(mut self, arguments: Arguments) -> Self {
        self.then_arguments = arguments.into();
        self
    }

    /// Arguments run when the groups do not apply.
    pub fn else_(mut self, arguments: Arguments) -> Self {
        self.else_arguments = arguments.into();
        self
    }
}

impl Argument for WhenGroupsArgument {
    fn set_up(&self, execution: &mut ExecutionContext) {
        let groups = self.groups.clone();
        let then_arguments = Arc::clone(&self.then_arguments);
        let else_arguments = Arc::clone(&self.else_arguments);
        execution.add_validation(
            Arc::new(move |ctx: &ValidationContext, validator: &Validator| {
                if validator.is_applied_for_groups(&groups) {
                    run_all(ctx, validator, &then_arguments)
                } else {
                    run_all(ctx, validator, &else_arguments)
                }
            }),
            &self.path,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::argument::{check, new_argument};
    use crate::arguments;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn run(arguments: &[Arc<dyn Argument>]) -> Result<(), Error> {
        Validator::new().validate(&ValidationContext::background(), arguments)
    }

    fn len(result: Result<(), Error>) -> usize {
        match result {
            Ok(()) => 0,
            Err(err) => err.violations().map_or(0, |v| v.len()),
        }
    }

    #[test]
    fn test_sequential_stops_at_first_failure() {
        assert_eq!(
            len(run(&arguments![sequentially(arguments![
                check(true),
                check(false),
                check(false)
            ])])),
            1
        );
    }

    #[test]
    fn test_all_joins_everything() {
        assert_eq!(
            len(run(&arguments![all(arguments![check(false), check(true), check(false)])])),
            2
        );
    }

    #[test]
    fn test_at_least_one_of() {
        assert_eq!(
            len(run(&arguments![at_least_one_of(arguments![check(false), check(true)])])),
            0
        );
        assert_eq!(
            len(run(&arguments![at_least_one_of(arguments![check(false), check(false)])])),
            2
        );
    }

    #[test]
    fn test_fault_aborts_combinator() {
        let fault = new_argument(|_ctx, _validator| Err(Error::Cancelled));
        assert!(matches!(
            run(&arguments![all(arguments![check(false), fault, check(false)])]),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn test_ignored_combinator_registers_nothing() {
        let mut execution = ExecutionContext::new();
        all(arguments![check(false)]).when(false).set_up(&mut execution);
        assert!(execution.is_empty());
    }

    #[test]
    fn test_when_branches() {
        assert_eq!(len(run(&arguments![when(true).then(arguments![check(false)])])), 1);
        assert_eq!(len(run(&arguments![when(false).then(arguments![check(false)])])), 0);
        assert_eq!(
            len(run(&arguments![when(false)
                .then(arguments![check(true)])
                .else_(arguments![check(false), check(false)])])),
            2
        );
    }

    fn counter(runs: &Arc<AtomicUsize>) -> Arc<dyn Argument> {
        let runs = Arc::clone(runs);
        Arc::new(new_argument(move |_ctx, _validator| {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(ViolationList::new())
        }))
    }

    #[test]
    fn test_when_groups_uses_validator_groups() {
        let then_runs = Arc::new(AtomicUsize::new(0));
        let else_runs = Arc::new(AtomicUsize::new(0));
        let argument = arguments![when_groups(["admin"])
            .then(vec![counter(&then_runs)])
            .else_(vec![counter(&else_runs)])];

        let ctx = ValidationContext::background();
        Validator::new()
            .with_groups(["admin"])
            .validate(&ctx, &argument)
            .unwrap();
        assert_eq!(then_runs.load(Ordering::SeqCst), 1);
        assert_eq!(else_runs.load(Ordering::SeqCst), 0);

        Validator::new().validate(&ctx, &argument).unwrap();
        assert_eq!(then_runs.load(Ordering::SeqCst), 1);
        assert_eq!(else_runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_groupless_check_is_skipped_under_explicit_groups() {
        let argument = arguments![when_groups(["admin"]).then(arguments![check(false)])];
        let ctx = ValidationContext::background();
        assert!(Validator::new()
            .with_groups(["admin"])
            .validate(&ctx, &argument)
            .is_ok());
        assert!(Validator::new()
            .with_groups(["admin", crate::DEFAULT_GROUP])
            .validate(&ctx, &argument)
            .is_err());
    }

    #[test]
    fn test_combinator_path_prefixes_children() {
        let err = run(&arguments![all(arguments![check(false).at_index(1)])
            .at_property("items")])
        .unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(
            violations.first().unwrap().property_path().to_string(),
            "items[1]"
        );
    }
}
