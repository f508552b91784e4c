//! Collection size and uniqueness constraints.

use std::collections::HashSet;
use std::hash::Hash;

use crate::error::{code, Error, ErrorCode};
use crate::message::TemplateParameter;
use crate::validation::ValidationContext;
use crate::validator::Validator;

use super::{
    impl_constraint_options, parameter, BaseConstraint, ComparablesConstraint,
    CountableConstraint, ViolationMessage,
};

/// Checks the number of elements of a collection.
///
/// Divisibility is checked first, then the maximum, then the minimum. When
/// the minimum and the maximum are equal the exact-count message is used for
/// both.
#[derive(Debug, Clone)]
pub struct CountConstraint {
    min: Option<usize>,
    max: Option<usize>,
    divisible_by: Option<usize>,
    min_message: ViolationMessage,
    max_message: ViolationMessage,
    exact_message: ViolationMessage,
    divisible_message: ViolationMessage,
    groups: Vec<String>,
    is_ignored: bool,
}

fn count(min: Option<usize>, max: Option<usize>, divisible_by: Option<usize>) -> CountConstraint {
    CountConstraint {
        min,
        max,
        divisible_by,
        min_message: ViolationMessage::new(code::TOO_FEW_ELEMENTS),
        max_message: ViolationMessage::new(code::TOO_MANY_ELEMENTS),
        exact_message: ViolationMessage::new(code::NOT_EXACT_COUNT),
        divisible_message: ViolationMessage::new(code::NOT_DIVISIBLE_COUNT),
        groups: Vec::new(),
        is_ignored: false,
    }
}

/// Requires at least `min` elements; reports [`code::TOO_FEW_ELEMENTS`].
pub fn has_min_count(min: usize) -> CountConstraint {
    count(Some(min), None, None)
}

/// Requires at most `max` elements; reports [`code::TOO_MANY_ELEMENTS`].
pub fn has_max_count(max: usize) -> CountConstraint {
    count(None, Some(max), None)
}

/// Requires between `min` and `max` elements inclusive.
pub fn has_count_between(min: usize, max: usize) -> CountConstraint {
    count(Some(min), Some(max), None)
}

/// Requires exactly `count` elements; reports [`code::NOT_EXACT_COUNT`].
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, code, ValidationContext, Validator};
/// use inquest::argument::countable_property;
/// use inquest::constraint::has_exact_count;
///
/// let err = Validator::new()
///     .validate(
///         &ValidationContext::background(),
///         &arguments![countable_property("seats", 3).with(has_exact_count(2))],
///     )
///     .unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     r#"violation at "seats": "This collection should contain exactly 2 element(s).""#
/// );
/// ```
pub fn has_exact_count(n: usize) -> CountConstraint {
    count(Some(n), Some(n), None)
}

/// Requires a count that is a multiple of `divisor`; reports
/// [`code::NOT_DIVISIBLE_COUNT`]. A zero divisor is a configuration fault.
pub fn has_count_divisible_by(divisor: usize) -> CountConstraint {
    count(None, None, Some(divisor))
}

impl CountConstraint {
    /// Disables the constraint unless `condition` holds.
    pub fn when(mut self, condition: bool) -> Self {
        self.is_ignored = !condition;
        self
    }

    /// Applies the constraint only for the given groups.
    pub fn when_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_min_error(mut self, code: ErrorCode) -> Self {
        self.min_message.set_code(code);
        self
    }

    pub fn with_max_error(mut self, code: ErrorCode) -> Self {
        self.max_message.set_code(code);
        self
    }

    pub fn with_exact_error(mut self, code: ErrorCode) -> Self {
        self.exact_message.set_code(code);
        self
    }

    pub fn with_divisible_error(mut self, code: ErrorCode) -> Self {
        self.divisible_message.set_code(code);
        self
    }

    pub fn with_min_message<I>(mut self, template: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = TemplateParameter>,
    {
        self.min_message.set_template(template, parameters);
        self
    }

    pub fn with_max_message<I>(mut self, template: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = TemplateParameter>,
    {
        self.max_message.set_template(template, parameters);
        self
    }

    pub fn with_exact_message<I>(mut self, template: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = TemplateParameter>,
    {
        self.exact_message.set_template(template, parameters);
        self
    }

    pub fn with_divisible_message<I>(mut self, template: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = TemplateParameter>,
    {
        self.divisible_message.set_template(template, parameters);
        self
    }

    fn check(&self, validator: &Validator, count: usize) -> Result<(), Error> {
        if self.is_ignored || validator.is_ignored_for_groups(&self.groups) {
            return Ok(());
        }

        if let Some(divisor) = self.divisible_by {
            if divisor == 0 {
                return Err(validator
                    .create_constraint_error(
                        "CountConstraint",
                        "divisibleBy must be greater than zero",
                    )
                    .into());
            }
            if count % divisor != 0 {
                return Err(self.divisible_message.violation(
                    validator,
                    [
                        parameter("{{ count }}", count),
                        parameter("{{ divisibleBy }}", divisor),
                    ],
                ));
            }
        }

        match (self.min, self.max) {
            (_, Some(max)) if count > max => {
                Err(self.limit_violation(validator, &self.max_message, count, max))
            }
            (Some(min), _) if count < min => {
                Err(self.limit_violation(validator, &self.min_message, count, min))
            }
            _ => Ok(()),
        }
    }

    fn limit_violation(
        &self,
        validator: &Validator,
        message: &ViolationMessage,
        count: usize,
        limit: usize,
    ) -> Error {
        let message = match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => &self.exact_message,
            _ => message,
        };
        message.violation(
            validator,
            [parameter("{{ count }}", count), parameter("{{ limit }}", limit)],
        )
    }
}

impl CountableConstraint for CountConstraint {
    fn validate_countable(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        count: usize,
    ) -> Result<(), Error> {
        self.check(validator, count)
    }
}

impl<T> ComparablesConstraint<T> for CountConstraint {
    fn validate_comparables(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        values: &[T],
    ) -> Result<(), Error> {
        self.check(validator, values.len())
    }
}

/// Requires every element of a collection to be distinct.
#[derive(Debug, Clone)]
pub struct UniqueConstraint {
    base: BaseConstraint,
}

/// Requires distinct elements; reports [`code::NOT_UNIQUE`].
pub fn has_unique_values() -> UniqueConstraint {
    UniqueConstraint {
        base: BaseConstraint::new(code::NOT_UNIQUE),
    }
}

impl UniqueConstraint {
    impl_constraint_options!();
}

impl<T: Eq + Hash> ComparablesConstraint<T> for UniqueConstraint {
    fn validate_comparables(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        values: &[T],
    ) -> Result<(), Error> {
        if self.base.should_skip(validator) {
            return Ok(());
        }

        let mut seen = HashSet::with_capacity(values.len());
        if values.iter().all(|value| seen.insert(value)) {
            return Ok(());
        }
        Err(self.base.violation(validator, []))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ValidationContext {
        ValidationContext::background()
    }

    fn message_of(result: Result<(), Error>) -> String {
        let err = result.unwrap_err();
        err.violations().unwrap().first().unwrap().message().to_string()
    }

    #[test]
    fn test_min_and_max() {
        let v = Validator::new();
        let between = has_count_between(1, 3);
        assert!(between.validate_countable(&ctx(), &v, 2).is_ok());
        assert_eq!(
            message_of(between.validate_countable(&ctx(), &v, 0)),
            "This collection should contain 1 element(s) or more."
        );
        assert_eq!(
            message_of(between.validate_countable(&ctx(), &v, 4)),
            "This collection should contain 3 element(s) or less."
        );
    }

    #[test]
    fn test_exact_count_uses_exact_message() {
        let v = Validator::new();
        let err = has_exact_count(2).validate_countable(&ctx(), &v, 1).unwrap_err();
        let violations = err.violations().unwrap();
        assert!(violations.is(&code::NOT_EXACT_COUNT));
    }

    #[test]
    fn test_divisible_checked_first() {
        let v = Validator::new();
        let err = has_count_divisible_by(2).validate_countable(&ctx(), &v, 3).unwrap_err();
        assert!(err.violations().unwrap().is(&code::NOT_DIVISIBLE_COUNT));

        let err = has_count_divisible_by(0).validate_countable(&ctx(), &v, 3).unwrap_err();
        assert!(err.is_fault());
    }

    #[test]
    fn test_custom_min_message() {
        let v = Validator::new();
        let constraint = has_min_count(2).with_min_message(
            "Need {{ limit }} {{ what }}, got {{ count }}.",
            [TemplateParameter::new("{{ what }}", "tags")],
        );
        assert_eq!(
            message_of(constraint.validate_comparables(&ctx(), &v, &["a"])),
            "Need 2 tags, got 1."
        );
    }

    #[test]
    fn test_unique_values() {
        let v = Validator::new();
        assert!(has_unique_values().validate_comparables(&ctx(), &v, &[1, 2, 3]).is_ok());
        let err = has_unique_values()
            .validate_comparables(&ctx(), &v, &["a", "b", "a"])
            .unwrap_err();
        assert!(err.violations().unwrap().is(&code::NOT_UNIQUE));
    }
}
