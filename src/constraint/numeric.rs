//! Numeric and ordered-value constraints.

use std::fmt::Display;

use crate::error::{code, Error, ErrorCode};
use crate::validation::ValidationContext;
use crate::validator::Validator;

use super::{
    impl_constraint_options, parameter, BaseConstraint, ComparableConstraint, NumberConstraint,
    Numeric,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Comparison {
    fn holds<T: PartialOrd>(self, value: &T, compared: &T) -> bool {
        match self {
            Comparison::Greater => value > compared,
            Comparison::GreaterOrEqual => value >= compared,
            Comparison::Less => value < compared,
            Comparison::LessOrEqual => value <= compared,
        }
    }
}

/// Compares the value against a fixed bound.
#[derive(Debug, Clone)]
pub struct ComparisonConstraint<T> {
    base: BaseConstraint,
    compared: T,
    comparison: Comparison,
}

fn comparison<T>(compared: T, comparison: Comparison, code: ErrorCode) -> ComparisonConstraint<T> {
    ComparisonConstraint {
        base: BaseConstraint::new(code),
        compared,
        comparison,
    }
}

/// Requires a value strictly greater than `value`; reports [`code::TOO_LOW_OR_EQUAL`].
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, code, ValidationContext, Validator};
/// use inquest::argument::number_property;
/// use inquest::constraint::is_greater_than;
///
/// let err = Validator::new()
///     .validate(
///         &ValidationContext::background(),
///         &arguments![number_property("quantity", 0).with(is_greater_than(0))],
///     )
///     .unwrap_err();
/// let violations = err.violations().unwrap();
/// assert_eq!(
///     violations.first().unwrap().message(),
///     "This value should be greater than 0."
/// );
/// ```
pub fn is_greater_than<T>(value: T) -> ComparisonConstraint<T> {
    comparison(value, Comparison::Greater, code::TOO_LOW_OR_EQUAL)
}

/// Requires a value greater than or equal to `value`; reports [`code::TOO_LOW`].
pub fn is_greater_than_or_equal<T>(value: T) -> ComparisonConstraint<T> {
    comparison(value, Comparison::GreaterOrEqual, code::TOO_LOW)
}

/// Requires a value strictly less than `value`; reports [`code::TOO_HIGH_OR_EQUAL`].
pub fn is_less_than<T>(value: T) -> ComparisonConstraint<T> {
    comparison(value, Comparison::Less, code::TOO_HIGH_OR_EQUAL)
}

/// Requires a value less than or equal to `value`; reports [`code::TOO_HIGH`].
pub fn is_less_than_or_equal<T>(value: T) -> ComparisonConstraint<T> {
    comparison(value, Comparison::LessOrEqual, code::TOO_HIGH)
}

impl<T: PartialOrd + Display> ComparisonConstraint<T> {
    impl_constraint_options!();

    fn check(&self, validator: &Validator, value: Option<&T>) -> Result<(), Error> {
        match value {
            Some(value)
                if !self.base.should_skip(validator)
                    && !self.comparison.holds(value, &self.compared) =>
            {
                Err(self.base.violation(
                    validator,
                    [
                        parameter("{{ comparedValue }}", &self.compared),
                        parameter("{{ value }}", value),
                    ],
                ))
            }
            _ => Ok(()),
        }
    }
}

impl<T: Numeric> NumberConstraint<T> for ComparisonConstraint<T> {
    fn validate_number(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<T>,
    ) -> Result<(), Error> {
        self.check(validator, value.as_ref())
    }
}

impl<T> ComparableConstraint<T> for ComparisonConstraint<T>
where
    T: PartialOrd + Display + Send + Sync,
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

/// Requires a value within an inclusive range.
#[derive(Debug, Clone)]
pub struct RangeConstraint<T> {
    base: BaseConstraint,
    min: T,
    max: T,
}

/// Requires `min <= value <= max`; reports [`code::NOT_IN_RANGE`].
pub fn is_between<T>(min: T, max: T) -> RangeConstraint<T> {
    RangeConstraint {
        base: BaseConstraint::new(code::NOT_IN_RANGE),
        min,
        max,
    }
}

impl<T: PartialOrd + Display> RangeConstraint<T> {
    impl_constraint_options!();

    fn check(&self, validator: &Validator, value: Option<&T>) -> Result<(), Error> {
        match value {
            Some(value)
                if !self.base.should_skip(validator)
                    && (*value < self.min || *value > self.max) =>
            {
                Err(self.base.violation(
                    validator,
                    [
                        parameter("{{ min }}", &self.min),
                        parameter("{{ max }}", &self.max),
                        parameter("{{ value }}", value),
                    ],
                ))
            }
            _ => Ok(()),
        }
    }
}

impl<T: Numeric> NumberConstraint<T> for RangeConstraint<T> {
    fn validate_number(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<T>,
    ) -> Result<(), Error> {
        self.check(validator, value.as_ref())
    }
}

impl<T> ComparableConstraint<T> for RangeConstraint<T>
where
    T: PartialOrd + Display + Send + Sync,
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Positive,
    PositiveOrZero,
    Negative,
    NegativeOrZero,
}

/// Compares the value against zero.
#[derive(Debug, Clone)]
pub struct SignConstraint {
    base: BaseConstraint,
    sign: Sign,
}

fn sign(sign: Sign, code: ErrorCode) -> SignConstraint {
    SignConstraint {
        base: BaseConstraint::new(code),
        sign,
    }
}

/// Requires a value above zero; reports [`code::NOT_POSITIVE`].
pub fn is_positive() -> SignConstraint {
    sign(Sign::Positive, code::NOT_POSITIVE)
}

/// Requires a value of zero or above; reports [`code::NOT_POSITIVE_OR_ZERO`].
pub fn is_positive_or_zero() -> SignConstraint {
    sign(Sign::PositiveOrZero, code::NOT_POSITIVE_OR_ZERO)
}

/// Requires a value below zero; reports [`code::NOT_NEGATIVE`].
pub fn is_negative() -> SignConstraint {
    sign(Sign::Negative, code::NOT_NEGATIVE)
}

/// Requires a value of zero or below; reports [`code::NOT_NEGATIVE_OR_ZERO`].
pub fn is_negative_or_zero() -> SignConstraint {
    sign(Sign::NegativeOrZero, code::NOT_NEGATIVE_OR_ZERO)
}

impl SignConstraint {
    impl_constraint_options!();
}

impl<T: Numeric> NumberConstraint<T> for SignConstraint {
    fn validate_number(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<T>,
    ) -> Result<(), Error> {
        let value = match value {
            Some(value) if !self.base.should_skip(validator) => value,
            _ => return Ok(()),
        };

        let zero = T::default();
        let holds = match self.sign {
            Sign::Positive => value > zero,
            Sign::PositiveOrZero => value >= zero,
            Sign::Negative => value < zero,
            Sign::NegativeOrZero => value <= zero,
        };
        if holds {
            return Ok(());
        }
        Err(self
            .base
            .violation(validator, [parameter("{{ value }}", value)]))
    }
}

/// Requires a whole multiple of a divisor.
#[derive(Debug, Clone)]
pub struct DivisibleConstraint<T> {
    base: BaseConstraint,
    divisor: T,
}

/// Requires a multiple of `divisor`; reports [`code::NOT_DIVISIBLE`].
///
/// A divisor that is not greater than zero is a configuration fault.
pub fn is_divisible_by<T: Numeric>(divisor: T) -> DivisibleConstraint<T> {
    DivisibleConstraint {
        base: BaseConstraint::new(code::NOT_DIVISIBLE),
        divisor,
    }
}

impl<T: Numeric> DivisibleConstraint<T> {
    impl_constraint_options!();
}

impl<T: Numeric> NumberConstraint<T> for DivisibleConstraint<T> {
    fn validate_number(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<T>,
    ) -> Result<(), Error> {
        if self.divisor <= T::default() {
            return Err(validator
                .create_constraint_error("DivisibleConstraint", "divisor must be greater than zero")
                .into());
        }

        match value {
            Some(value)
                if !self.base.should_skip(validator) && !value.is_divisible_by(self.divisor) =>
            {
                Err(self.base.violation(
                    validator,
                    [
                        parameter("{{ comparedValue }}", self.divisor),
                        parameter("{{ value }}", value),
                    ],
                ))
            }
            _ => Ok(()),
        }
    }
}
