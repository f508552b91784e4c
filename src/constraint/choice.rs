//! Choice constraint: the value must be one of a fixed set.

use std::fmt::Display;
use std::hash::Hash;

use indexmap::IndexSet;

use crate::error::{code, Error};
use crate::validation::ValidationContext;
use crate::validator::Validator;

use super::{
    impl_constraint_options, parameter, BaseConstraint, ComparableConstraint, NumberConstraint,
    Numeric, StringConstraint,
};

/// Requires the value to be one of the configured choices.
///
/// Blank values (the type's default) are accepted unless
/// [`without_blank`](Self::without_blank) is set. An empty choice set is a
/// configuration fault.
#[derive(Debug, Clone)]
pub struct ChoiceConstraint<T> {
    base: BaseConstraint,
    choices: IndexSet<T>,
    disallow_blank: bool,
}

/// Requires one of `choices`; reports [`code::NO_SUCH_CHOICE`].
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, code, ValidationContext, Validator};
/// use inquest::argument::number_property;
/// use inquest::constraint::is_one_of;
///
/// let err = Validator::new()
///     .validate(
///         &ValidationContext::background(),
///         &arguments![number_property("age", 17).with(is_one_of([18, 21, 30, 40]))],
///     )
///     .unwrap_err();
/// let violations = err.violations().unwrap();
/// assert!(violations.is(&code::NO_SUCH_CHOICE));
/// assert_eq!(violations.first().unwrap().property_path().to_string(), "age");
/// ```
pub fn is_one_of<T, I>(choices: I) -> ChoiceConstraint<T>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    ChoiceConstraint {
        base: BaseConstraint::new(code::NO_SUCH_CHOICE),
        choices: choices.into_iter().collect(),
        disallow_blank: false,
    }
}

impl<T> ChoiceConstraint<T>
where
    T: Eq + Hash + Display + Default,
{
    impl_constraint_options!();

    /// Reports blank values too.
    pub fn without_blank(mut self) -> Self {
        self.disallow_blank = true;
        self
    }

    fn check(&self, validator: &Validator, value: Option<&T>) -> Result<(), Error> {
        if self.choices.is_empty() {
            return Err(validator
                .create_constraint_error("ChoiceConstraint", "empty list of choices")
                .into());
        }

        let value = match value {
            Some(value) => value,
            None => return Ok(()),
        };
        if self.base.should_skip(validator)
            || (!self.disallow_blank && *value == T::default())
            || self.choices.contains(value)
        {
            return Ok(());
        }

        let choices = self
            .choices
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Err(self.base.violation(
            validator,
            [
                parameter("{{ value }}", value),
                parameter("{{ choices }}", choices),
            ],
        ))
    }
}

impl<T> ComparableConstraint<T> for ChoiceConstraint<T>
where
    T: Eq + Hash + Display + Default + Send + Sync,
{
    fn validate_comparable(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&T>,
    ) -> Result<(), Error> {
        self.check(validator, value)
    }
}

impl<T> NumberConstraint<T> for ChoiceConstraint<T>
where
    T: Numeric + Eq + Hash,
{
    fn validate_number(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<T>,
    ) -> Result<(), Error> {
        self.check(validator, value.as_ref())
    }
}

impl StringConstraint for ChoiceConstraint<String> {
    fn validate_string(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&str>,
    ) -> Result<(), Error> {
        let value = value.map(str::to_string);
        self.check(validator, value.as_ref())
    }
}

impl StringConstraint for ChoiceConstraint<&'static str> {
    fn validate_string(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&str>,
    ) -> Result<(), Error> {
        if self.choices.is_empty() {
            return Err(validator
                .create_constraint_error("ChoiceConstraint", "empty list of choices")
                .into());
        }
        match value {
            Some(value) if !self.disallow_blank && value.is_empty() => Ok(()),
            Some(value) if self.choices.contains(value) => Ok(()),
            Some(value) if !self.base.should_skip(validator) => {
                let choices = self.choices.iter().copied().collect::<Vec<_>>().join(", ");
                Err(self.base.violation(
                    validator,
                    [
                        parameter("{{ value }}", value),
                        parameter("{{ choices }}", choices),
                    ],
                ))
            }
            _ => Ok(()),
        }
    }
}
