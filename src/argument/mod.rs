//! Validation arguments and the execution context they register into.
//!
//! An [`Argument`] is a declared unit of validation: a value, the rules to
//! apply to it and the path suffix where it lives. When a
//! [`Validator`](crate::Validator) runs, every argument first registers one
//! or more checks into an [`ExecutionContext`]; the checks run afterwards, in
//! declaration order.
//!
//! This module provides:
//! - [`ValidatorArgument`] and [`new_argument`] for arbitrary closures
//! - typed value arguments such as [`string`], [`number`] and [`countable`]
//! - [`Checker`] for plain boolean conditions
//! - [`Validatable`] and [`valid`] for types that validate themselves
//! - the combinators [`sequentially`], [`all`], [`at_least_one_of`], [`when`],
//!   [`when_groups`] and the parallel [`async_`]

mod combinators;
mod parallel;
mod value;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::{code, Error, ErrorCode, ViolationList};
use crate::message::TemplateParameter;
use crate::path::PathElement;
use crate::validation::ValidationContext;
use crate::validator::Validator;

pub use combinators::{
    all, at_least_one_of, at_property, sequentially, when, when_groups, AllArgument,
    AtLeastOneOfArgument, SequentialArgument, WhenArgument, WhenGroupsArgument,
};
pub use parallel::{async_, AsyncArgument};
pub use value::*;

/// A registered check: runs against a validator already positioned at the
/// argument's path and returns the violations it found.
pub type ValidateFn =
    Arc<dyn Fn(&ValidationContext, &Validator) -> Result<ViolationList, Error> + Send + Sync>;

/// A list of type-erased arguments, as built by [`arguments!`](crate::arguments).
pub type Arguments = Vec<Arc<dyn Argument>>;

/// Builds an [`Arguments`] list from argument expressions of any type.
///
/// # Example
///
/// ```rust
/// use inquest::arguments;
/// use inquest::argument::{check, countable};
///
/// let args = arguments![check(true), countable(3)];
/// assert_eq!(args.len(), 2);
/// ```
#[macro_export]
macro_rules! arguments {
    ($($argument:expr),* $(,)?) => {
        ::std::vec![
            $(::std::sync::Arc::new($argument) as ::std::sync::Arc<dyn $crate::Argument>),*
        ]
    };
}

/// A declared unit of validation.
pub trait Argument: Send + Sync {
    /// Registers this argument's checks.
    fn set_up(&self, execution: &mut ExecutionContext);
}

/// Per-call registration buffer of (check, path suffix) pairs.
///
/// Created fresh for every [`Validator::validate`] call and discarded once
/// the registered checks have run.
#[derive(Default)]
pub struct ExecutionContext {
    validations: Vec<(ValidateFn, Vec<PathElement>)>,
}

impl ExecutionContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a check to run at `path` below the validator's current path.
    pub fn add_validation(&mut self, validate: ValidateFn, path: &[PathElement]) {
        self.validations.push((validate, path.to_vec()));
    }

    /// Returns the number of registered checks.
    pub fn len(&self) -> usize {
        self.validations.len()
    }

    /// Returns true if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.validations.is_empty()
    }

    pub(crate) fn validations(&self) -> impl Iterator<Item = (&ValidateFn, &[PathElement])> {
        self.validations
            .iter()
            .map(|(validate, path)| (validate, path.as_slice()))
    }
}

// Path builder methods shared by every argument that carries a `path` field.
macro_rules! impl_path_builders {
    () => {
        /// Appends elements to the argument's path.
        pub fn at<I>(mut self, elements: I) -> Self
        where
            I: IntoIterator<Item = $crate::path::PathElement>,
        {
            self.path.extend(elements);
            self
        }

        /// Places the argument under a property.
        pub fn at_property(mut self, name: impl Into<String>) -> Self {
            self.path.push($crate::path::PathElement::Property(name.into()));
            self
        }

        /// Places the argument under an index.
        pub fn at_index(mut self, index: usize) -> Self {
            self.path.push($crate::path::PathElement::Index(index));
            self
        }
    };
}

// Path builders plus `when`, for arguments that carry an `is_ignored` flag.
macro_rules! impl_argument_builders {
    () => {
        $crate::argument::impl_path_builders!();

        /// Skips the argument entirely unless `condition` holds.
        pub fn when(mut self, condition: bool) -> Self {
            self.is_ignored = !condition;
            self
        }
    };
}

pub(crate) use impl_argument_builders;
pub(crate) use impl_path_builders;

/// An argument backed by an arbitrary check closure.
#[derive(Clone)]
pub struct ValidatorArgument {
    validate: ValidateFn,
    path: Vec<PathElement>,
    is_ignored: bool,
}

impl ValidatorArgument {
    impl_argument_builders!();
}

impl Argument for ValidatorArgument {
    fn set_up(&self, execution: &mut ExecutionContext) {
        if !self.is_ignored {
            execution.add_validation(Arc::clone(&self.validate), &self.path);
        }
    }
}

/// Wraps a check closure into an argument.
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, code, ValidationContext, Validator, ViolationList};
/// use inquest::argument::new_argument;
///
/// let argument = new_argument(|_ctx, validator| {
///     Ok(ViolationList::from(
///         validator.build_violation(code::NOT_VALID, "rejected").create(),
///     ))
/// })
/// .at_property("payload");
///
/// let err = Validator::new()
///     .validate(&ValidationContext::background(), &arguments![argument])
///     .unwrap_err();
/// assert_eq!(err.to_string(), r#"violation at "payload": "rejected""#);
/// ```
pub fn new_argument<F>(validate: F) -> ValidatorArgument
where
    F: Fn(&ValidationContext, &Validator) -> Result<ViolationList, Error> + Send + Sync + 'static,
{
    ValidatorArgument {
        validate: Arc::new(validate),
        path: Vec::new(),
        is_ignored: false,
    }
}

/// An argument reporting the outcome of an earlier validation.
///
/// Its violations are merged as-is; a fault in `result` aborts the call.
pub fn check_no_violations(result: Result<(), Error>) -> ValidatorArgument {
    new_argument(move |_ctx, _validator| ViolationList::from_result(result.clone()))
}

/// Checks a boolean condition computed by the caller.
#[derive(Debug, Clone)]
pub struct Checker {
    code: ErrorCode,
    message_template: String,
    parameters: Vec<TemplateParameter>,
    path: Vec<PathElement>,
    groups: Vec<String>,
    is_ignored: bool,
    is_valid: bool,
}

impl Checker {
    impl_argument_builders!();

    /// Applies the check only for the given groups.
    pub fn when_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    /// Reports failures with a different code; the message template is kept.
    pub fn with_error(mut self, code: ErrorCode) -> Self {
        self.code = code;
        self
    }

    /// Overrides the message template and its parameters.
    pub fn with_message<I>(mut self, template: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = TemplateParameter>,
    {
        self.message_template = template.into();
        self.parameters = parameters.into_iter().collect();
        self
    }

    fn validate(&self, validator: &Validator) -> ViolationList {
        if self.is_valid || self.is_ignored || validator.is_ignored_for_groups(&self.groups) {
            return ViolationList::new();
        }

        validator
            .build_violation(self.code.clone(), self.message_template.clone())
            .with_parameters(self.parameters.iter().cloned())
            .create()
            .into()
    }
}

impl Argument for Checker {
    fn set_up(&self, execution: &mut ExecutionContext) {
        let checker = self.clone();
        execution.add_validation(
            Arc::new(move |_ctx: &ValidationContext, validator: &Validator| {
                Ok(checker.validate(validator))
            }),
            &self.path,
        );
    }
}

/// Reports a [`code::NOT_VALID`] violation unless `is_valid` holds.
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, code, ValidationContext, Validator};
/// use inquest::argument::check_property;
///
/// let err = Validator::new()
///     .validate(
///         &ValidationContext::background(),
///         &arguments![check_property("password", false).with_error(code::NOT_VALID)],
///     )
///     .unwrap_err();
/// assert!(err.violations().unwrap().is(&code::NOT_VALID));
/// ```
pub fn check(is_valid: bool) -> Checker {
    Checker {
        code: code::NOT_VALID,
        message_template: code::NOT_VALID.message().to_string(),
        parameters: Vec::new(),
        path: Vec::new(),
        groups: Vec::new(),
        is_ignored: false,
        is_valid,
    }
}

/// Same as [`check`], placed under a property.
pub fn check_property(name: impl Into<String>, is_valid: bool) -> Checker {
    check(is_valid).at_property(name)
}

/// A value that knows how to validate itself.
///
/// Closures with the matching signature are validatable too.
pub trait Validatable {
    /// Validates `self` with a validator positioned at its path.
    fn validate(&self, ctx: &ValidationContext, validator: &Validator) -> Result<(), Error>;
}

impl<F> Validatable for F
where
    F: Fn(&ValidationContext, &Validator) -> Result<(), Error>,
{
    fn validate(&self, ctx: &ValidationContext, validator: &Validator) -> Result<(), Error> {
        self(ctx, validator)
    }
}

/// Runs a [`Validatable`] value.
pub fn valid<V>(value: V) -> ValidatorArgument
where
    V: Validatable + Send + Sync + 'static,
{
    new_argument(move |ctx, validator| ViolationList::from_result(value.validate(ctx, validator)))
}

/// Same as [`valid`], placed under a property.
pub fn valid_property<V>(name: impl Into<String>, value: V) -> ValidatorArgument
where
    V: Validatable + Send + Sync + 'static,
{
    valid(value).at_property(name)
}

/// Runs every element of a slice at its index.
pub fn valid_slice<V>(values: Vec<V>) -> ValidatorArgument
where
    V: Validatable + Send + Sync + 'static,
{
    new_argument(move |ctx, validator| {
        let mut violations = ViolationList::new();
        for (i, value) in values.iter().enumerate() {
            violations.append_from_result(value.validate(ctx, &validator.at_index(i)))?;
        }
        Ok(violations)
    })
}

/// Same as [`valid_slice`], placed under a property.
pub fn valid_slice_property<V>(name: impl Into<String>, values: Vec<V>) -> ValidatorArgument
where
    V: Validatable + Send + Sync + 'static,
{
    valid_slice(values).at_property(name)
}

/// Runs every entry of a map under its key, in insertion order.
pub fn valid_map<V>(values: IndexMap<String, V>) -> ValidatorArgument
where
    V: Validatable + Send + Sync + 'static,
{
    new_argument(move |ctx, validator| {
        let mut violations = ViolationList::new();
        for (key, value) in &values {
            violations.append_from_result(value.validate(ctx, &validator.at_property(key.as_str())))?;
        }
        Ok(violations)
    })
}

/// Same as [`valid_map`], placed under a property.
pub fn valid_map_property<V>(name: impl Into<String>, values: IndexMap<String, V>) -> ValidatorArgument
where
    V: Validatable + Send + Sync + 'static,
{
    valid_map(values).at_property(name)
}

/// Collapses several validation results into one.
///
/// Violations are joined in order; the first fault is returned instead.
///
/// # Example
///
/// ```rust
/// use inquest::{argument::filter, code, Error, Validator};
///
/// let validator = Validator::new();
/// let first = Err(Error::from(validator.at_property("a").build_violation(code::IS_BLANK, "blank").create()));
/// let second = Ok(());
///
/// let err = filter([first, second]).unwrap_err();
/// assert_eq!(err.violations().unwrap().len(), 1);
/// ```
pub fn filter<I>(results: I) -> Result<(), Error>
where
    I: IntoIterator<Item = Result<(), Error>>,
{
    let mut violations = ViolationList::new();
    for result in results {
        violations.append_from_result(result)?;
    }
    violations.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(arguments: &[Arc<dyn Argument>]) -> Result<(), Error> {
        Validator::new().validate(&ValidationContext::background(), arguments)
    }

    #[test]
    fn test_execution_context_keeps_order() {
        let mut execution = ExecutionContext::new();
        check(true).at_property("a").set_up(&mut execution);
        check(true).at_index(1).set_up(&mut execution);

        let paths: Vec<_> = execution.validations().map(|(_, path)| path.to_vec()).collect();
        assert_eq!(
            paths,
            vec![vec![PathElement::property("a")], vec![PathElement::index(1)]]
        );
    }

    #[test]
    fn test_ignored_argument_registers_nothing() {
        let mut execution = ExecutionContext::new();
        new_argument(|_ctx, _validator| Ok(ViolationList::new()))
            .when(false)
            .set_up(&mut execution);
        assert!(execution.is_empty());
    }

    #[test]
    fn test_checker_message_and_groups() {
        let err = run(&arguments![check_property("terms", false)
            .with_message("{{ name }} must be accepted", [TemplateParameter::new("{{ name }}", "Terms")])])
        .unwrap_err();
        assert_eq!(err.to_string(), r#"violation at "terms": "Terms must be accepted""#);

        assert!(run(&arguments![check(false).when_groups(["admin"])]).is_ok());
        assert!(run(&arguments![check(false).when(false)]).is_ok());
    }

    #[test]
    fn test_check_no_violations_propagates_faults() {
        assert!(run(&arguments![check_no_violations(Ok(()))]).is_ok());
        assert!(matches!(
            run(&arguments![check_no_violations(Err(Error::Cancelled))]),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn test_valid_slice_and_map_paths() {
        let non_empty = |value: &'static str| {
            move |_ctx: &ValidationContext, validator: &Validator| -> Result<(), Error> {
                if value.is_empty() {
                    Err(validator.build_violation(code::IS_BLANK, "blank").create().into())
                } else {
                    Ok(())
                }
            }
        };

        let mut map = IndexMap::new();
        map.insert("first".to_string(), non_empty(""));
        map.insert("second name".to_string(), non_empty("x"));

        let err = run(&arguments![
            valid_slice_property("tags", vec![non_empty("a"), non_empty("")]),
            valid_map_property("names", map),
        ])
        .unwrap_err();

        let paths: Vec<_> = err
            .violations()
            .unwrap()
            .iter()
            .map(|v| v.property_path().to_string())
            .collect();
        assert_eq!(paths, vec!["tags[1]", "names.first"]);
    }

    #[test]
    fn test_filter_returns_first_fault() {
        let result = filter([Ok(()), Err(Error::Cancelled), Ok(())]);
        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(filter(Vec::new()).is_ok());
    }
}
