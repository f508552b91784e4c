//! String constraints: length, regular expressions and predicates.
//!
//! All of them skip absent and empty strings; combine with
//! [`is_not_blank`](super::is_not_blank) to require a value.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{code, Error, ErrorCode};
use crate::message::TemplateParameter;
use crate::validation::ValidationContext;
use crate::validator::Validator;

use super::{impl_constraint_options, parameter, BaseConstraint, StringConstraint, ViolationMessage};

/// Checks the length of a string, counted in characters.
#[derive(Debug, Clone)]
pub struct LengthConstraint {
    base: BaseConstraint,
    min: Option<usize>,
    max: Option<usize>,
    min_message: ViolationMessage,
    max_message: ViolationMessage,
    exact_message: ViolationMessage,
}

fn length(min: Option<usize>, max: Option<usize>) -> LengthConstraint {
    LengthConstraint {
        base: BaseConstraint::new(code::NOT_VALID),
        min,
        max,
        min_message: ViolationMessage::new(code::TOO_SHORT),
        max_message: ViolationMessage::new(code::TOO_LONG),
        exact_message: ViolationMessage::new(code::NOT_EXACT_LENGTH),
    }
}

/// Requires at least `min` characters; reports [`code::TOO_SHORT`].
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, code, ValidationContext, Validator};
/// use inquest::argument::string;
/// use inquest::constraint::has_min_length;
///
/// let err = Validator::new()
///     .validate(&ValidationContext::background(), &arguments![string("ab").with(has_min_length(3))])
///     .unwrap_err();
/// let violations = err.violations().unwrap();
/// assert!(violations.is(&code::TOO_SHORT));
/// assert_eq!(
///     violations.first().unwrap().message(),
///     "This value is too short. It should have 3 character(s) or more."
/// );
/// ```
pub fn has_min_length(min: usize) -> LengthConstraint {
    length(Some(min), None)
}

/// Allows at most `max` characters; reports [`code::TOO_LONG`].
pub fn has_max_length(max: usize) -> LengthConstraint {
    length(None, Some(max))
}

/// Requires between `min` and `max` characters inclusive.
pub fn has_length_between(min: usize, max: usize) -> LengthConstraint {
    length(Some(min), Some(max))
}

/// Requires exactly `count` characters; reports [`code::NOT_EXACT_LENGTH`].
pub fn has_exact_length(count: usize) -> LengthConstraint {
    length(Some(count), Some(count))
}

impl LengthConstraint {
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

    fn violation(
        &self,
        validator: &Validator,
        message: &ViolationMessage,
        value: &str,
        count: usize,
        limit: usize,
    ) -> Error {
        let message = if self.min.is_some() && self.min == self.max {
            &self.exact_message
        } else {
            message
        };
        message.violation(
            validator,
            [
                parameter("{{ value }}", format!("{:?}", value)),
                parameter("{{ length }}", count),
                parameter("{{ limit }}", limit),
            ],
        )
    }
}

impl StringConstraint for LengthConstraint {
    fn validate_string(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&str>,
    ) -> Result<(), Error> {
        let value = match value {
            Some(value) if !value.is_empty() => value,
            _ => return Ok(()),
        };
        if self.base.should_skip(validator) {
            return Ok(());
        }

        let count = value.chars().count();
        if let Some(max) = self.max.filter(|max| count > *max) {
            return Err(self.violation(validator, &self.max_message, value, count, max));
        }
        if let Some(min) = self.min.filter(|min| count < *min) {
            return Err(self.violation(validator, &self.min_message, value, count, min));
        }
        Ok(())
    }
}

/// Checks a string against a regular expression.
#[derive(Debug, Clone)]
pub struct RegexConstraint {
    base: BaseConstraint,
    regex: Result<Regex, String>,
    should_match: bool,
}

fn regex_constraint(regex: Result<Regex, String>, should_match: bool) -> RegexConstraint {
    RegexConstraint {
        base: BaseConstraint::new(code::NOT_VALID),
        regex,
        should_match,
    }
}

/// Requires a string matching `regex`; reports [`code::NOT_VALID`].
pub fn matches(regex: Regex) -> RegexConstraint {
    regex_constraint(Ok(regex), true)
}

/// Requires a string not matching `regex`; reports [`code::NOT_VALID`].
pub fn does_not_match(regex: Regex) -> RegexConstraint {
    regex_constraint(Ok(regex), false)
}

/// Same as [`matches`], compiling `pattern` first.
///
/// An invalid pattern is reported as a [`ConstraintError`](crate::ConstraintError)
/// fault when the constraint runs.
pub fn matches_pattern(pattern: &str) -> RegexConstraint {
    regex_constraint(Regex::new(pattern).map_err(|err| err.to_string()), true)
}

impl RegexConstraint {
    impl_constraint_options!();
}

impl StringConstraint for RegexConstraint {
    fn validate_string(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&str>,
    ) -> Result<(), Error> {
        let regex = match &self.regex {
            Ok(regex) => regex,
            Err(err) => {
                return Err(validator
                    .create_constraint_error("RegexConstraint", format!("invalid pattern: {}", err))
                    .into())
            }
        };

        let value = match value {
            Some(value) if !value.is_empty() => value,
            _ => return Ok(()),
        };
        if self.base.should_skip(validator) || regex.is_match(value) == self.should_match {
            return Ok(());
        }
        Err(self.base.violation(validator, [parameter("{{ value }}", value)]))
    }
}

/// Checks a string with a caller-supplied predicate.
#[derive(Clone)]
pub struct StringFuncConstraint {
    base: BaseConstraint,
    is_valid: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl fmt::Debug for StringFuncConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringFuncConstraint")
            .field("base", &self.base)
            .finish_non_exhaustive()
    }
}

/// Requires a string accepted by `is_valid`; reports [`code::NOT_VALID`].
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, ValidationContext, Validator};
/// use inquest::argument::string_property;
/// use inquest::constraint::of_string_by;
///
/// let has_at = of_string_by(|s| s.contains('@'));
/// let err = Validator::new()
///     .validate(&ValidationContext::background(), &arguments![string_property("email", "bad").with(has_at)])
///     .unwrap_err();
/// assert_eq!(err.to_string(), r#"violation at "email": "This value is not valid.""#);
/// ```
pub fn of_string_by<F>(is_valid: F) -> StringFuncConstraint
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    StringFuncConstraint {
        base: BaseConstraint::new(code::NOT_VALID),
        is_valid: Arc::new(is_valid),
    }
}

/// Requires valid JSON; reports [`code::INVALID_JSON`].
pub fn is_json() -> StringFuncConstraint {
    of_string_by(|s| serde_json::from_str::<serde_json::Value>(s).is_ok())
        .with_error(code::INVALID_JSON)
        .with_message(code::INVALID_JSON.message(), [])
}

/// Requires a base-10 integer; reports [`code::NOT_INTEGER`].
pub fn is_integer() -> StringFuncConstraint {
    of_string_by(|s| s.parse::<i64>().is_ok())
        .with_error(code::NOT_INTEGER)
        .with_message(code::NOT_INTEGER.message(), [])
}

/// Requires a decimal number; reports [`code::NOT_NUMERIC`].
pub fn is_numeric() -> StringFuncConstraint {
    of_string_by(|s| s.parse::<f64>().is_ok())
        .with_error(code::NOT_NUMERIC)
        .with_message(code::NOT_NUMERIC.message(), [])
}

impl StringFuncConstraint {
    impl_constraint_options!();
}

impl StringConstraint for StringFuncConstraint {
    fn validate_string(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&str>,
    ) -> Result<(), Error> {
        let value = match value {
            Some(value) if !value.is_empty() => value,
            _ => return Ok(()),
        };
        if self.base.should_skip(validator) || (self.is_valid)(value) {
            return Ok(());
        }
        Err(self.base.violation(validator, [parameter("{{ value }}", value)]))
    }
}
