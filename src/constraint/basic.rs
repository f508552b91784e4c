//! Blank and nil checks.
//!
//! A value is blank when it is absent or equal to its type's default value
//! (empty string, zero, `false`, the epoch for times, a zero count).

use chrono::{DateTime, Utc};

use crate::error::{code, Error};
use crate::validation::ValidationContext;
use crate::validator::Validator;

use super::{
    impl_constraint_options, BaseConstraint, BoolConstraint, ComparableConstraint,
    CountableConstraint, NilConstraint, NumberConstraint, Numeric, StringConstraint,
    TimeConstraint,
};

/// Requires a value that is present and not blank.
#[derive(Debug, Clone)]
pub struct NotBlankConstraint {
    base: BaseConstraint,
    allow_nil: bool,
}

/// Requires a non-blank value; reports [`code::IS_BLANK`].
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, ValidationContext, Validator};
/// use inquest::argument::{nil_string, string};
/// use inquest::constraint::is_not_blank;
///
/// let validator = Validator::new();
/// let ctx = ValidationContext::background();
///
/// assert!(validator.validate(&ctx, &arguments![string("").with(is_not_blank())]).is_err());
/// assert!(validator
///     .validate(&ctx, &arguments![nil_string(None).with(is_not_blank().with_allowed_nil())])
///     .is_ok());
/// ```
pub fn is_not_blank() -> NotBlankConstraint {
    NotBlankConstraint {
        base: BaseConstraint::new(code::IS_BLANK),
        allow_nil: false,
    }
}

impl NotBlankConstraint {
    impl_constraint_options!();

    /// Accepts an absent value; only present blank values are reported.
    pub fn with_allowed_nil(mut self) -> Self {
        self.allow_nil = true;
        self
    }

    fn check(&self, validator: &Validator, is_nil: bool, is_blank: bool) -> Result<(), Error> {
        if self.base.should_skip(validator) || (self.allow_nil && is_nil) || !is_blank {
            return Ok(());
        }
        Err(self.base.violation(validator, []))
    }
}

impl StringConstraint for NotBlankConstraint {
    fn validate_string(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&str>,
    ) -> Result<(), Error> {
        self.check(validator, value.is_none(), value.map_or(true, str::is_empty))
    }
}

impl<T: PartialEq + Default> ComparableConstraint<T> for NotBlankConstraint {
    fn validate_comparable(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&T>,
    ) -> Result<(), Error> {
        self.check(
            validator,
            value.is_none(),
            value.map_or(true, |v| *v == T::default()),
        )
    }
}

impl<T: Numeric> NumberConstraint<T> for NotBlankConstraint {
    fn validate_number(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<T>,
    ) -> Result<(), Error> {
        self.check(
            validator,
            value.is_none(),
            value.map_or(true, |v| v == T::default()),
        )
    }
}

impl BoolConstraint for NotBlankConstraint {
    fn validate_bool(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<bool>,
    ) -> Result<(), Error> {
        self.check(validator, value.is_none(), value != Some(true))
    }
}

impl TimeConstraint for NotBlankConstraint {
    fn validate_time(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&DateTime<Utc>>,
    ) -> Result<(), Error> {
        self.check(
            validator,
            value.is_none(),
            value.map_or(true, |v| *v == DateTime::<Utc>::default()),
        )
    }
}

impl CountableConstraint for NotBlankConstraint {
    fn validate_countable(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        count: usize,
    ) -> Result<(), Error> {
        self.check(validator, false, count == 0)
    }
}

/// Requires a value that is absent or blank.
#[derive(Debug, Clone)]
pub struct BlankConstraint {
    base: BaseConstraint,
}

/// Requires a blank value; reports [`code::NOT_BLANK`].
pub fn is_blank() -> BlankConstraint {
    BlankConstraint {
        base: BaseConstraint::new(code::NOT_BLANK),
    }
}

impl BlankConstraint {
    impl_constraint_options!();

    fn check(&self, validator: &Validator, is_blank: bool) -> Result<(), Error> {
        if self.base.should_skip(validator) || is_blank {
            return Ok(());
        }
        Err(self.base.violation(validator, []))
    }
}

impl StringConstraint for BlankConstraint {
    fn validate_string(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&str>,
    ) -> Result<(), Error> {
        self.check(validator, value.map_or(true, str::is_empty))
    }
}

impl<T: PartialEq + Default> ComparableConstraint<T> for BlankConstraint {
    fn validate_comparable(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&T>,
    ) -> Result<(), Error> {
        self.check(validator, value.map_or(true, |v| *v == T::default()))
    }
}

impl<T: Numeric> NumberConstraint<T> for BlankConstraint {
    fn validate_number(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<T>,
    ) -> Result<(), Error> {
        self.check(validator, value.map_or(true, |v| v == T::default()))
    }
}

impl BoolConstraint for BlankConstraint {
    fn validate_bool(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<bool>,
    ) -> Result<(), Error> {
        self.check(validator, value != Some(true))
    }
}

impl TimeConstraint for BlankConstraint {
    fn validate_time(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&DateTime<Utc>>,
    ) -> Result<(), Error> {
        self.check(validator, value.map_or(true, |v| *v == DateTime::<Utc>::default()))
    }
}

impl CountableConstraint for BlankConstraint {
    fn validate_countable(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        count: usize,
    ) -> Result<(), Error> {
        self.check(validator, count == 0)
    }
}

/// Requires a present value.
#[derive(Debug, Clone)]
pub struct NotNilConstraint {
    base: BaseConstraint,
}

/// Requires a present value; reports [`code::IS_NIL`].
pub fn is_not_nil() -> NotNilConstraint {
    NotNilConstraint {
        base: BaseConstraint::new(code::IS_NIL),
    }
}

impl NotNilConstraint {
    impl_constraint_options!();

    fn check(&self, validator: &Validator, is_nil: bool) -> Result<(), Error> {
        if self.base.should_skip(validator) || !is_nil {
            return Ok(());
        }
        Err(self.base.violation(validator, []))
    }
}

/// Requires an absent value.
#[derive(Debug, Clone)]
pub struct IsNilConstraint {
    base: BaseConstraint,
}

/// Requires an absent value; reports [`code::NOT_NIL`].
pub fn is_nil() -> IsNilConstraint {
    IsNilConstraint {
        base: BaseConstraint::new(code::NOT_NIL),
    }
}

impl IsNilConstraint {
    impl_constraint_options!();

    fn check(&self, validator: &Validator, is_nil: bool) -> Result<(), Error> {
        if self.base.should_skip(validator) || is_nil {
            return Ok(());
        }
        Err(self.base.violation(validator, []))
    }
}

// Both nil checks only look at presence, so they share their capability impls.
macro_rules! impl_presence_capabilities {
    ($($constraint:ty),*) => {
        $(
            impl NilConstraint for $constraint {
                fn validate_nil(
                    &self,
                    _ctx: &ValidationContext,
                    validator: &Validator,
                    is_nil: bool,
                ) -> Result<(), Error> {
                    self.check(validator, is_nil)
                }
            }

            impl StringConstraint for $constraint {
                fn validate_string(
                    &self,
                    _ctx: &ValidationContext,
                    validator: &Validator,
                    value: Option<&str>,
                ) -> Result<(), Error> {
                    self.check(validator, value.is_none())
                }
            }

            impl<T> ComparableConstraint<T> for $constraint {
                fn validate_comparable(
                    &self,
                    _ctx: &ValidationContext,
                    validator: &Validator,
                    value: Option<&T>,
                ) -> Result<(), Error> {
                    self.check(validator, value.is_none())
                }
            }

            impl<T: Numeric> NumberConstraint<T> for $constraint {
                fn validate_number(
                    &self,
                    _ctx: &ValidationContext,
                    validator: &Validator,
                    value: Option<T>,
                ) -> Result<(), Error> {
                    self.check(validator, value.is_none())
                }
            }

            impl BoolConstraint for $constraint {
                fn validate_bool(
                    &self,
                    _ctx: &ValidationContext,
                    validator: &Validator,
                    value: Option<bool>,
                ) -> Result<(), Error> {
                    self.check(validator, value.is_none())
                }
            }

            impl TimeConstraint for $constraint {
                fn validate_time(
                    &self,
                    _ctx: &ValidationContext,
                    validator: &Validator,
                    value: Option<&DateTime<Utc>>,
                ) -> Result<(), Error> {
                    self.check(validator, value.is_none())
                }
            }
        )*
    };
}

impl_presence_capabilities!(NotNilConstraint, IsNilConstraint);

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ValidationContext {
        ValidationContext::background()
    }

    #[test]
    fn test_not_blank_string() {
        let validator = Validator::new();
        let constraint = is_not_blank();
        assert!(constraint.validate_string(&ctx(), &validator, Some("x")).is_ok());
        assert!(constraint.validate_string(&ctx(), &validator, Some("")).is_err());
        assert!(constraint.validate_string(&ctx(), &validator, None).is_err());
        assert!(constraint
            .with_allowed_nil()
            .validate_string(&ctx(), &validator, None)
            .is_ok());
    }

    #[test]
    fn test_not_blank_other_kinds() {
        let validator = Validator::new();
        let constraint = is_not_blank();
        assert!(NumberConstraint::<i32>::validate_number(&constraint, &ctx(), &validator, Some(0)).is_err());
        assert!(NumberConstraint::<f64>::validate_number(&constraint, &ctx(), &validator, Some(0.5)).is_ok());
        assert!(constraint.validate_bool(&ctx(), &validator, Some(false)).is_err());
        assert!(constraint.validate_countable(&ctx(), &validator, 0).is_err());
        assert!(constraint
            .validate_time(&ctx(), &validator, Some(&Utc::now()))
            .is_ok());
        assert!(ComparableConstraint::<String>::validate_comparable(
            &constraint,
            &ctx(),
            &validator,
            Some(&String::new())
        )
        .is_err());
    }

    #[test]
    fn test_blank() {
        let validator = Validator::new();
        let constraint = is_blank();
        assert!(constraint.validate_string(&ctx(), &validator, None).is_ok());
        assert!(constraint.validate_string(&ctx(), &validator, Some("")).is_ok());

        let err = constraint
            .validate_string(&ctx(), &validator.at_property("note"), Some("x"))
            .unwrap_err();
        let violations = err.violations().unwrap();
        assert!(violations.is(&code::NOT_BLANK));
        assert_eq!(violations.first().unwrap().property_path().to_string(), "note");
    }

    #[test]
    fn test_nil_checks() {
        let validator = Validator::new();
        assert!(is_not_nil().validate_nil(&ctx(), &validator, true).is_err());
        assert!(is_not_nil().validate_nil(&ctx(), &validator, false).is_ok());
        assert!(is_nil().validate_bool(&ctx(), &validator, Some(false)).is_err());
        assert!(is_nil().validate_string(&ctx(), &validator, None).is_ok());
    }

    #[test]
    fn test_skipped_when_disabled() {
        let validator = Validator::new();
        assert!(is_not_blank()
            .when(false)
            .validate_string(&ctx(), &validator, None)
            .is_ok());
        assert!(is_not_nil()
            .when_groups(["strict"])
            .validate_nil(&ctx(), &validator, true)
            .is_ok());
    }
}
