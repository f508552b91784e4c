//! Constraint capabilities and the built-in constraint catalog.
//!
//! A constraint is a rule plugin. It declares which kinds of values it can
//! check by implementing one or more capability traits:
//!
//! | Capability | Checked value |
//! |------------|---------------|
//! | [`NilConstraint`] | whether a value is absent |
//! | [`BoolConstraint`] | `Option<bool>` |
//! | [`NumberConstraint`] | `Option<T>` for a [`Numeric`] `T` |
//! | [`StringConstraint`] | `Option<&str>` |
//! | [`ComparableConstraint`] | `Option<&T>` |
//! | [`ComparablesConstraint`] | `&[T]` |
//! | [`CountableConstraint`] | an element count |
//! | [`TimeConstraint`] | `Option<&DateTime<Utc>>` |
//! | [`Constraint`] | `&T`, for arbitrary checks |
//!
//! Every capability method returns `Ok(())` when the value passes, a
//! [`Violation`](crate::Violation) error built through the validator when it
//! does not, and a [`ConstraintError`](crate::ConstraintError) fault when the
//! constraint itself is misconfigured.

mod basic;
mod choice;
mod iterable;
mod numeric;
mod string;
mod time;

use std::fmt::Display;

use chrono::{DateTime, Utc};

use crate::error::{Error, ErrorCode};
use crate::message::TemplateParameter;
use crate::validation::ValidationContext;
use crate::validator::Validator;

pub use basic::{
    is_blank, is_nil, is_not_blank, is_not_nil, BlankConstraint, IsNilConstraint,
    NotBlankConstraint, NotNilConstraint,
};
pub use choice::{is_one_of, ChoiceConstraint};
pub use iterable::{
    has_count_between, has_count_divisible_by, has_exact_count, has_max_count, has_min_count,
    has_unique_values, CountConstraint, UniqueConstraint,
};
pub use numeric::{
    is_between, is_divisible_by, is_greater_than, is_greater_than_or_equal, is_less_than,
    is_less_than_or_equal, is_negative, is_negative_or_zero, is_positive, is_positive_or_zero,
    ComparisonConstraint, DivisibleConstraint, RangeConstraint, SignConstraint,
};
pub use string::{
    does_not_match, has_exact_length, has_length_between, has_max_length, has_min_length,
    is_integer, is_json, is_numeric, matches, matches_pattern, of_string_by, LengthConstraint,
    RegexConstraint, StringFuncConstraint,
};
pub use time::{
    is_date, is_date_time, is_earlier_than, is_earlier_than_or_equal, is_later_than,
    is_later_than_or_equal, is_time, DateTimeConstraint, TimeComparisonConstraint,
};

/// Number kinds accepted by [`NumberConstraint`].
pub trait Numeric: Copy + PartialOrd + Display + Default + Send + Sync + 'static {
    /// Returns true if `self` is a whole multiple of `divisor`.
    fn is_divisible_by(self, divisor: Self) -> bool;
}

macro_rules! impl_numeric_int {
    ($($t:ty),*) => {
        $(impl Numeric for $t {
            fn is_divisible_by(self, divisor: Self) -> bool {
                self % divisor == 0
            }
        })*
    };
}

macro_rules! impl_numeric_float {
    ($($t:ty),*) => {
        $(impl Numeric for $t {
            fn is_divisible_by(self, divisor: Self) -> bool {
                (self % divisor) == 0.0
            }
        })*
    };
}

impl_numeric_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_numeric_float!(f32, f64);

/// A check over values of an arbitrary type.
pub trait Constraint<T>: Send + Sync {
    fn validate(&self, ctx: &ValidationContext, validator: &Validator, value: &T)
        -> Result<(), Error>;
}

/// A check over whether a value is present.
pub trait NilConstraint: Send + Sync {
    fn validate_nil(
        &self,
        ctx: &ValidationContext,
        validator: &Validator,
        is_nil: bool,
    ) -> Result<(), Error>;
}

pub trait BoolConstraint: Send + Sync {
    fn validate_bool(
        &self,
        ctx: &ValidationContext,
        validator: &Validator,
        value: Option<bool>,
    ) -> Result<(), Error>;
}

pub trait NumberConstraint<T: Numeric>: Send + Sync {
    fn validate_number(
        &self,
        ctx: &ValidationContext,
        validator: &Validator,
        value: Option<T>,
    ) -> Result<(), Error>;
}

pub trait StringConstraint: Send + Sync {
    fn validate_string(
        &self,
        ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&str>,
    ) -> Result<(), Error>;
}

pub trait ComparableConstraint<T>: Send + Sync {
    fn validate_comparable(
        &self,
        ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&T>,
    ) -> Result<(), Error>;
}

pub trait ComparablesConstraint<T>: Send + Sync {
    fn validate_comparables(
        &self,
        ctx: &ValidationContext,
        validator: &Validator,
        values: &[T],
    ) -> Result<(), Error>;
}

pub trait CountableConstraint: Send + Sync {
    fn validate_countable(
        &self,
        ctx: &ValidationContext,
        validator: &Validator,
        count: usize,
    ) -> Result<(), Error>;
}

pub trait TimeConstraint: Send + Sync {
    fn validate_time(
        &self,
        ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&DateTime<Utc>>,
    ) -> Result<(), Error>;
}

/// The code, message template and extra parameters of one kind of violation
/// a constraint can report.
#[derive(Debug, Clone)]
pub struct ViolationMessage {
    code: ErrorCode,
    template: String,
    parameters: Vec<TemplateParameter>,
}

impl ViolationMessage {
    /// Uses the code's default message.
    pub fn new(code: ErrorCode) -> Self {
        Self {
            template: code.message().to_string(),
            code,
            parameters: Vec::new(),
        }
    }

    /// Replaces the code; the template is kept.
    pub fn set_code(&mut self, code: ErrorCode) {
        self.code = code;
    }

    /// Replaces the template and its extra parameters.
    pub fn set_template<I>(&mut self, template: impl Into<String>, parameters: I)
    where
        I: IntoIterator<Item = TemplateParameter>,
    {
        self.template = template.into();
        self.parameters = parameters.into_iter().collect();
    }

    /// Builds the violation at the validator's path.
    ///
    /// `leading` parameters come before the configured ones.
    pub fn violation<I>(&self, validator: &Validator, leading: I) -> Error
    where
        I: IntoIterator<Item = TemplateParameter>,
    {
        let parameters: Vec<_> = leading
            .into_iter()
            .chain(self.parameters.iter().cloned())
            .collect();
        validator
            .build_violation(self.code.clone(), self.template.clone())
            .with_parameters(parameters)
            .create()
            .into()
    }
}

/// Options shared by every built-in constraint.
#[derive(Debug, Clone)]
pub struct BaseConstraint {
    message: ViolationMessage,
    groups: Vec<String>,
    is_ignored: bool,
}

impl BaseConstraint {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: ViolationMessage::new(code),
            groups: Vec::new(),
            is_ignored: false,
        }
    }

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

    /// Reports violations with a different code.
    pub fn with_error(mut self, code: ErrorCode) -> Self {
        self.message.set_code(code);
        self
    }

    /// Reports violations with a different message template.
    pub fn with_message<I>(mut self, template: impl Into<String>, parameters: I) -> Self
    where
        I: IntoIterator<Item = TemplateParameter>,
    {
        self.message.set_template(template, parameters);
        self
    }

    /// Returns true if the constraint is disabled or not in the validator's groups.
    pub fn should_skip(&self, validator: &Validator) -> bool {
        self.is_ignored || validator.is_ignored_for_groups(&self.groups)
    }

    /// Builds the violation at the validator's path.
    pub fn violation<I>(&self, validator: &Validator, leading: I) -> Error
    where
        I: IntoIterator<Item = TemplateParameter>,
    {
        self.message.violation(validator, leading)
    }
}

// Forwards the shared options to a `base: BaseConstraint` field.
macro_rules! impl_constraint_options {
    () => {
        /// Disables the constraint unless `condition` holds.
        pub fn when(mut self, condition: bool) -> Self {
            self.base = self.base.when(condition);
            self
        }

        /// Applies the constraint only for the given groups.
        pub fn when_groups<I, S>(mut self, groups: I) -> Self
        where
            I: IntoIterator<Item = S>,
            S: Into<String>,
        {
            self.base = self.base.when_groups(groups);
            self
        }

        /// Reports violations with a different code.
        pub fn with_error(mut self, code: $crate::ErrorCode) -> Self {
            self.base = self.base.with_error(code);
            self
        }

        /// Reports violations with a different message template.
        pub fn with_message<I>(mut self, template: impl Into<String>, parameters: I) -> Self
        where
            I: IntoIterator<Item = $crate::message::TemplateParameter>,
        {
            self.base = self.base.with_message(template, parameters);
            self
        }
    };
}

pub(crate) use impl_constraint_options;

pub(crate) fn parameter(key: &str, value: impl ToString) -> TemplateParameter {
    TemplateParameter::new(key, value.to_string())
}
