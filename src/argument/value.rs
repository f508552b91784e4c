//! Typed value arguments.
//!
//! Each constructor binds a value of one category to the capability its
//! constraints must implement: [`string`] accepts any [`StringConstraint`],
//! [`number`] any [`NumberConstraint`], and so on. Constraints are added with
//! [`ConstrainedArgument::with`] and run in the order they were added.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::constraint::{
    BoolConstraint, ComparableConstraint, ComparablesConstraint, Constraint, CountableConstraint,
    NilConstraint, NumberConstraint, Numeric, StringConstraint, TimeConstraint,
};
use crate::error::{Error, ViolationList};
use crate::path::PathElement;
use crate::validation::ValidationContext;
use crate::validator::Validator;

use super::{impl_argument_builders, Argument, ExecutionContext};

type Apply<V, C> =
    fn(&V, &ValidationContext, &Validator, &[Arc<C>]) -> Result<ViolationList, Error>;

/// Converts a constraint into the shared form stored by a value argument.
///
/// Implemented for every constraint type that has the capability `C`.
pub trait IntoConstraint<C: ?Sized> {
    fn into_constraint(self) -> Arc<C>;
}

impl<K: StringConstraint + 'static> IntoConstraint<dyn StringConstraint> for K {
    fn into_constraint(self) -> Arc<dyn StringConstraint> {
        Arc::new(self)
    }
}

impl<T: Numeric, K: NumberConstraint<T> + 'static> IntoConstraint<dyn NumberConstraint<T>> for K {
    fn into_constraint(self) -> Arc<dyn NumberConstraint<T>> {
        Arc::new(self)
    }
}

impl<K: BoolConstraint + 'static> IntoConstraint<dyn BoolConstraint> for K {
    fn into_constraint(self) -> Arc<dyn BoolConstraint> {
        Arc::new(self)
    }
}

impl<K: NilConstraint + 'static> IntoConstraint<dyn NilConstraint> for K {
    fn into_constraint(self) -> Arc<dyn NilConstraint> {
        Arc::new(self)
    }
}

impl<T, K: ComparableConstraint<T> + 'static> IntoConstraint<dyn ComparableConstraint<T>> for K {
    fn into_constraint(self) -> Arc<dyn ComparableConstraint<T>> {
        Arc::new(self)
    }
}

impl<T, K: ComparablesConstraint<T> + 'static> IntoConstraint<dyn ComparablesConstraint<T>> for K {
    fn into_constraint(self) -> Arc<dyn ComparablesConstraint<T>> {
        Arc::new(self)
    }
}

impl<K: CountableConstraint + 'static> IntoConstraint<dyn CountableConstraint> for K {
    fn into_constraint(self) -> Arc<dyn CountableConstraint> {
        Arc::new(self)
    }
}

impl<K: TimeConstraint + 'static> IntoConstraint<dyn TimeConstraint> for K {
    fn into_constraint(self) -> Arc<dyn TimeConstraint> {
        Arc::new(self)
    }
}

impl<T, K: Constraint<T> + 'static> IntoConstraint<dyn Constraint<T>> for K {
    fn into_constraint(self) -> Arc<dyn Constraint<T>> {
        Arc::new(self)
    }
}

/// A value together with the constraints to check it against.
pub struct ConstrainedArgument<V, C: ?Sized> {
    value: Arc<V>,
    constraints: Vec<Arc<C>>,
    apply: Apply<V, C>,
    path: Vec<PathElement>,
    is_ignored: bool,
}

impl<V, C: ?Sized> ConstrainedArgument<V, C> {
    fn new(value: V, apply: Apply<V, C>) -> Self {
        Self {
            value: Arc::new(value),
            constraints: Vec::new(),
            apply,
            path: Vec::new(),
            is_ignored: false,
        }
    }

    impl_argument_builders!();

    /// Adds a constraint; constraints run in the order they were added.
    pub fn with<K: IntoConstraint<C>>(mut self, constraint: K) -> Self {
        self.constraints.push(constraint.into_constraint());
        self
    }

    /// Adds constraints that are already shared, keeping their order.
    pub fn with_all<I>(mut self, constraints: I) -> Self
    where
        I: IntoIterator<Item = Arc<C>>,
    {
        self.constraints.extend(constraints);
        self
    }
}

impl<V, C> Argument for ConstrainedArgument<V, C>
where
    V: Send + Sync + 'static,
    C: ?Sized + Send + Sync + 'static,
{
    fn set_up(&self, execution: &mut ExecutionContext) {
        if self.is_ignored {
            return;
        }

        let value = Arc::clone(&self.value);
        let constraints: Arc<[Arc<C>]> = self.constraints.clone().into();
        let apply = self.apply;
        execution.add_validation(
            Arc::new(move |ctx: &ValidationContext, validator: &Validator| {
                apply(&value, ctx, validator, &constraints)
            }),
            &self.path,
        );
    }
}

fn collect<C: ?Sized>(
    constraints: &[Arc<C>],
    mut check: impl FnMut(&C) -> Result<(), Error>,
) -> Result<ViolationList, Error> {
    let mut violations = ViolationList::new();
    for constraint in constraints {
        violations.append_from_result(check(constraint))?;
    }
    Ok(violations)
}

fn apply_string(
    value: &Option<String>,
    ctx: &ValidationContext,
    validator: &Validator,
    constraints: &[Arc<dyn StringConstraint>],
) -> Result<ViolationList, Error> {
    collect(constraints, |c| c.validate_string(ctx, validator, value.as_deref()))
}

#[allow(clippy::ptr_arg)]
fn apply_each_string(
    values: &Vec<String>,
    ctx: &ValidationContext,
    validator: &Validator,
    constraints: &[Arc<dyn StringConstraint>],
) -> Result<ViolationList, Error> {
    let mut violations = ViolationList::new();
    for (i, value) in values.iter().enumerate() {
        let validator = validator.at_index(i);
        violations.join(collect(constraints, |c| {
            c.validate_string(ctx, &validator, Some(value.as_str()))
        })?);
    }
    Ok(violations)
}

fn apply_number<T: Numeric>(
    value: &Option<T>,
    ctx: &ValidationContext,
    validator: &Validator,
    constraints: &[Arc<dyn NumberConstraint<T>>],
) -> Result<ViolationList, Error> {
    collect(constraints, |c| c.validate_number(ctx, validator, *value))
}

#[allow(clippy::ptr_arg)]
fn apply_each_number<T: Numeric>(
    values: &Vec<T>,
    ctx: &ValidationContext,
    validator: &Validator,
    constraints: &[Arc<dyn NumberConstraint<T>>],
) -> Result<ViolationList, Error> {
    let mut violations = ViolationList::new();
    for (i, value) in values.iter().enumerate() {
        let validator = validator.at_index(i);
        violations.join(collect(constraints, |c| {
            c.validate_number(ctx, &validator, Some(*value))
        })?);
    }
    Ok(violations)
}

fn apply_bool(
    value: &Option<bool>,
    ctx: &ValidationContext,
    validator: &Validator,
    constraints: &[Arc<dyn BoolConstraint>],
) -> Result<ViolationList, Error> {
    collect(constraints, |c| c.validate_bool(ctx, validator, *value))
}

fn apply_nil(
    is_nil: &bool,
    ctx: &ValidationContext,
    validator: &Validator,
    constraints: &[Arc<dyn NilConstraint>],
) -> Result<ViolationList, Error> {
    collect(constraints, |c| c.validate_nil(ctx, validator, *is_nil))
}

fn apply_comparable<T>(
    value: &Option<T>,
    ctx: &ValidationContext,
    validator: &Validator,
    constraints: &[Arc<dyn ComparableConstraint<T>>],
) -> Result<ViolationList, Error> {
    collect(constraints, |c| c.validate_comparable(ctx, validator, value.as_ref()))
}

#[allow(clippy::ptr_arg)]
fn apply_each_comparable<T>(
    values: &Vec<T>,
    ctx: &ValidationContext,
    validator: &Validator,
    constraints: &[Arc<dyn ComparableConstraint<T>>],
) -> Result<ViolationList, Error> {
    let mut violations = ViolationList::new();
    for (i, value) in values.iter().enumerate() {
        let validator = validator.at_index(i);
        violations.join(collect(constraints, |c| {
            c.validate_comparable(ctx, &validator, Some(value))
        })?);
    }
    Ok(violations)
}

#[allow(clippy::ptr_arg)]
fn apply_comparables<T>(
    values: &Vec<T>,
    ctx: &ValidationContext,
    validator: &Validator,
    constraints: &[Arc<dyn ComparablesConstraint<T>>],
) -> Result<ViolationList, Error> {
    collect(constraints, |c| c.validate_comparables(ctx, validator, values))
}

fn apply_countable(
    count: &usize,
    ctx: &ValidationContext,
    validator: &Validator,
    constraints: &[Arc<dyn CountableConstraint>],
) -> Result<ViolationList, Error> {
    collect(constraints, |c| c.validate_countable(ctx, validator, *count))
}

fn apply_time(
    value: &Option<DateTime<Utc>>,
    ctx: &ValidationContext,
    validator: &Validator,
    constraints: &[Arc<dyn TimeConstraint>],
) -> Result<ViolationList, Error> {
    collect(constraints, |c| c.validate_time(ctx, validator, value.as_ref()))
}

fn apply_this<T>(
    value: &T,
    ctx: &ValidationContext,
    validator: &Validator,
    constraints: &[Arc<dyn Constraint<T>>],
) -> Result<ViolationList, Error> {
    collect(constraints, |c| c.validate(ctx, validator, value))
}

/// A string checked by [`StringConstraint`]s.
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, ValidationContext, Validator};
/// use inquest::argument::string;
/// use inquest::constraint::{has_min_length, is_not_blank};
///
/// let result = Validator::new().validate(
///     &ValidationContext::background(),
///     &arguments![string("ab").with(is_not_blank()).with(has_min_length(3))],
/// );
/// assert_eq!(result.unwrap_err().violations().unwrap().len(), 1);
/// ```
pub fn string(value: impl Into<String>) -> ConstrainedArgument<Option<String>, dyn StringConstraint> {
    ConstrainedArgument::new(Some(value.into()), apply_string)
}

/// A string that may be absent.
pub fn nil_string(value: Option<String>) -> ConstrainedArgument<Option<String>, dyn StringConstraint> {
    ConstrainedArgument::new(value, apply_string)
}

/// Same as [`string`], placed under a property.
pub fn string_property(
    name: impl Into<String>,
    value: impl Into<String>,
) -> ConstrainedArgument<Option<String>, dyn StringConstraint> {
    string(value).at_property(name)
}

/// Same as [`nil_string`], placed under a property.
pub fn nil_string_property(
    name: impl Into<String>,
    value: Option<String>,
) -> ConstrainedArgument<Option<String>, dyn StringConstraint> {
    nil_string(value).at_property(name)
}

/// Every string of a list, each checked at its index.
pub fn each_string<I, S>(values: I) -> ConstrainedArgument<Vec<String>, dyn StringConstraint>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ConstrainedArgument::new(values.into_iter().map(Into::into).collect(), apply_each_string)
}

/// Same as [`each_string`], placed under a property.
pub fn each_string_property<I, S>(
    name: impl Into<String>,
    values: I,
) -> ConstrainedArgument<Vec<String>, dyn StringConstraint>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    each_string(values).at_property(name)
}

/// A number checked by [`NumberConstraint`]s.
pub fn number<T: Numeric>(value: T) -> ConstrainedArgument<Option<T>, dyn NumberConstraint<T>> {
    ConstrainedArgument::new(Some(value), apply_number::<T>)
}

/// A number that may be absent.
pub fn nil_number<T: Numeric>(
    value: Option<T>,
) -> ConstrainedArgument<Option<T>, dyn NumberConstraint<T>> {
    ConstrainedArgument::new(value, apply_number::<T>)
}

/// Same as [`number`], placed under a property.
pub fn number_property<T: Numeric>(
    name: impl Into<String>,
    value: T,
) -> ConstrainedArgument<Option<T>, dyn NumberConstraint<T>> {
    number(value).at_property(name)
}

/// Same as [`nil_number`], placed under a property.
pub fn nil_number_property<T: Numeric>(
    name: impl Into<String>,
    value: Option<T>,
) -> ConstrainedArgument<Option<T>, dyn NumberConstraint<T>> {
    nil_number(value).at_property(name)
}

/// Every number of a list, each checked at its index.
pub fn each_number<T: Numeric>(values: Vec<T>) -> ConstrainedArgument<Vec<T>, dyn NumberConstraint<T>> {
    ConstrainedArgument::new(values, apply_each_number::<T>)
}

/// Same as [`each_number`], placed under a property.
pub fn each_number_property<T: Numeric>(
    name: impl Into<String>,
    values: Vec<T>,
) -> ConstrainedArgument<Vec<T>, dyn NumberConstraint<T>> {
    each_number(values).at_property(name)
}

/// A boolean checked by [`BoolConstraint`]s.
pub fn boolean(value: bool) -> ConstrainedArgument<Option<bool>, dyn BoolConstraint> {
    ConstrainedArgument::new(Some(value), apply_bool)
}

/// A boolean that may be absent.
pub fn nil_boolean(value: Option<bool>) -> ConstrainedArgument<Option<bool>, dyn BoolConstraint> {
    ConstrainedArgument::new(value, apply_bool)
}

/// Same as [`boolean`], placed under a property.
pub fn boolean_property(
    name: impl Into<String>,
    value: bool,
) -> ConstrainedArgument<Option<bool>, dyn BoolConstraint> {
    boolean(value).at_property(name)
}

/// Whether a value is absent, checked by [`NilConstraint`]s.
pub fn nil(is_nil: bool) -> ConstrainedArgument<bool, dyn NilConstraint> {
    ConstrainedArgument::new(is_nil, apply_nil)
}

/// Same as [`nil`], placed under a property.
pub fn nil_property(name: impl Into<String>, is_nil: bool) -> ConstrainedArgument<bool, dyn NilConstraint> {
    nil(is_nil).at_property(name)
}

/// A comparable value checked by [`ComparableConstraint`]s.
pub fn comparable<T>(value: T) -> ConstrainedArgument<Option<T>, dyn ComparableConstraint<T>>
where
    T: Send + Sync + 'static,
{
    ConstrainedArgument::new(Some(value), apply_comparable::<T>)
}

/// A comparable value that may be absent.
pub fn nil_comparable<T>(value: Option<T>) -> ConstrainedArgument<Option<T>, dyn ComparableConstraint<T>>
where
    T: Send + Sync + 'static,
{
    ConstrainedArgument::new(value, apply_comparable::<T>)
}

/// Same as [`comparable`], placed under a property.
pub fn comparable_property<T>(
    name: impl Into<String>,
    value: T,
) -> ConstrainedArgument<Option<T>, dyn ComparableConstraint<T>>
where
    T: Send + Sync + 'static,
{
    comparable(value).at_property(name)
}

/// Every value of a list, each checked at its index.
pub fn each_comparable<T>(values: Vec<T>) -> ConstrainedArgument<Vec<T>, dyn ComparableConstraint<T>>
where
    T: Send + Sync + 'static,
{
    ConstrainedArgument::new(values, apply_each_comparable::<T>)
}

/// Same as [`each_comparable`], placed under a property.
pub fn each_comparable_property<T>(
    name: impl Into<String>,
    values: Vec<T>,
) -> ConstrainedArgument<Vec<T>, dyn ComparableConstraint<T>>
where
    T: Send + Sync + 'static,
{
    each_comparable(values).at_property(name)
}

/// A whole list checked by [`ComparablesConstraint`]s.
pub fn comparables<T>(values: Vec<T>) -> ConstrainedArgument<Vec<T>, dyn ComparablesConstraint<T>>
where
    T: Send + Sync + 'static,
{
    ConstrainedArgument::new(values, apply_comparables::<T>)
}

/// Same as [`comparables`], placed under a property.
pub fn comparables_property<T>(
    name: impl Into<String>,
    values: Vec<T>,
) -> ConstrainedArgument<Vec<T>, dyn ComparablesConstraint<T>>
where
    T: Send + Sync + 'static,
{
    comparables(values).at_property(name)
}

/// An element count checked by [`CountableConstraint`]s.
pub fn countable(count: usize) -> ConstrainedArgument<usize, dyn CountableConstraint> {
    ConstrainedArgument::new(count, apply_countable)
}

/// Same as [`countable`], placed under a property.
pub fn countable_property(
    name: impl Into<String>,
    count: usize,
) -> ConstrainedArgument<usize, dyn CountableConstraint> {
    countable(count).at_property(name)
}

/// A time checked by [`TimeConstraint`]s.
pub fn time(value: DateTime<Utc>) -> ConstrainedArgument<Option<DateTime<Utc>>, dyn TimeConstraint> {
    ConstrainedArgument::new(Some(value), apply_time)
}

/// A time that may be absent.
pub fn nil_time(
    value: Option<DateTime<Utc>>,
) -> ConstrainedArgument<Option<DateTime<Utc>>, dyn TimeConstraint> {
    ConstrainedArgument::new(value, apply_time)
}

/// Same as [`time`], placed under a property.
pub fn time_property(
    name: impl Into<String>,
    value: DateTime<Utc>,
) -> ConstrainedArgument<Option<DateTime<Utc>>, dyn TimeConstraint> {
    time(value).at_property(name)
}

/// A value of any type checked by generic [`Constraint`]s.
pub fn this<T>(value: T) -> ConstrainedArgument<T, dyn Constraint<T>>
where
    T: Send + Sync + 'static,
{
    ConstrainedArgument::new(value, apply_this::<T>)
}

/// Same as [`this`], placed under a property.
pub fn this_property<T>(name: impl Into<String>, value: T) -> ConstrainedArgument<T, dyn Constraint<T>>
where
    T: Send + Sync + 'static,
{
    this(value).at_property(name)
}
