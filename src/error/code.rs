//! Error codes identifying the kind of a violation.
//!
//! An [`ErrorCode`] pairs a machine-readable code with the default message
//! template used when a constraint does not override it. The constants in
//! this module are the codes produced by the built-in constraints.

use std::borrow::Cow;
use std::fmt::{self, Display};

/// A machine-readable violation kind with its default message template.
///
/// Two codes are the same kind when their `code` strings are equal.
///
/// # Example
///
/// ```rust
/// use inquest::{code, ErrorCode};
///
/// let custom = ErrorCode::new("not unique email", "This email is already registered.");
/// assert_eq!(custom.code(), "not unique email");
/// assert_eq!(code::IS_BLANK.message(), "This value should not be blank.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    code: Cow<'static, str>,
    message: Cow<'static, str>,
}

impl ErrorCode {
    /// Creates a code from owned or borrowed strings.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates a code from static strings, usable in constants.
    pub const fn from_static(code: &'static str, message: &'static str) -> Self {
        Self {
            code: Cow::Borrowed(code),
            message: Cow::Borrowed(message),
        }
    }

    /// Returns the machine-readable code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the default message template.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

impl std::error::Error for ErrorCode {}

pub const INVALID_DATE: ErrorCode =
    ErrorCode::from_static("invalid date", "This value is not a valid date.");
pub const INVALID_DATE_TIME: ErrorCode =
    ErrorCode::from_static("invalid datetime", "This value is not a valid datetime.");
pub const INVALID_JSON: ErrorCode =
    ErrorCode::from_static("invalid JSON", "This value should be valid JSON.");
pub const INVALID_TIME: ErrorCode =
    ErrorCode::from_static("invalid time", "This value is not a valid time.");
pub const IS_BLANK: ErrorCode =
    ErrorCode::from_static("is blank", "This value should not be blank.");
pub const IS_NIL: ErrorCode = ErrorCode::from_static("is nil", "This value should not be nil.");
pub const NO_SUCH_CHOICE: ErrorCode = ErrorCode::from_static(
    "no such choice",
    "The value you selected is not a valid choice.",
);
pub const NOT_BLANK: ErrorCode =
    ErrorCode::from_static("is not blank", "This value should be blank.");
pub const NOT_DIVISIBLE: ErrorCode = ErrorCode::from_static(
    "is not divisible",
    "This value should be a multiple of {{ comparedValue }}.",
);
pub const NOT_DIVISIBLE_COUNT: ErrorCode = ErrorCode::from_static(
    "not divisible count",
    "The number of elements in this collection should be a multiple of {{ divisibleBy }}.",
);
pub const NOT_EXACT_COUNT: ErrorCode = ErrorCode::from_static(
    "not exact count",
    "This collection should contain exactly {{ limit }} element(s).",
);
pub const NOT_EXACT_LENGTH: ErrorCode = ErrorCode::from_static(
    "not exact length",
    "This value should have exactly {{ limit }} character(s).",
);
pub const NOT_IN_RANGE: ErrorCode = ErrorCode::from_static(
    "is not in range",
    "This value should be between {{ min }} and {{ max }}.",
);
pub const NOT_INTEGER: ErrorCode =
    ErrorCode::from_static("is not an integer", "This value is not an integer.");
pub const NOT_NEGATIVE: ErrorCode =
    ErrorCode::from_static("is not negative", "This value should be negative.");
pub const NOT_NEGATIVE_OR_ZERO: ErrorCode = ErrorCode::from_static(
    "is not negative or zero",
    "This value should be either negative or zero.",
);
pub const NOT_NIL: ErrorCode = ErrorCode::from_static("is not nil", "This value should be nil.");
pub const NOT_NUMERIC: ErrorCode =
    ErrorCode::from_static("is not numeric", "This value is not a valid number.");
pub const NOT_POSITIVE: ErrorCode =
    ErrorCode::from_static("is not positive", "This value should be positive.");
pub const NOT_POSITIVE_OR_ZERO: ErrorCode = ErrorCode::from_static(
    "is not positive or zero",
    "This value should be either positive or zero.",
);
pub const NOT_UNIQUE: ErrorCode = ErrorCode::from_static(
    "is not unique",
    "This collection should contain only unique elements.",
);
pub const NOT_VALID: ErrorCode = ErrorCode::from_static("is not valid", "This value is not valid.");
pub const TOO_EARLY: ErrorCode = ErrorCode::from_static(
    "is too early",
    "This value should be later than or equal to {{ comparedValue }}.",
);
pub const TOO_EARLY_OR_EQUAL: ErrorCode = ErrorCode::from_static(
    "is too early or equal",
    "This value should be later than {{ comparedValue }}.",
);
pub const TOO_FEW_ELEMENTS: ErrorCode = ErrorCode::from_static(
    "too few elements",
    "This collection should contain {{ limit }} element(s) or more.",
);
pub const TOO_HIGH: ErrorCode = ErrorCode::from_static(
    "is too high",
    "This value should be less than or equal to {{ comparedValue }}.",
);
pub const TOO_HIGH_OR_EQUAL: ErrorCode = ErrorCode::from_static(
    "is too high or equal",
    "This value should be less than {{ comparedValue }}.",
);
pub const TOO_LATE: ErrorCode = ErrorCode::from_static(
    "is too late",
    "This value should be earlier than or equal to {{ comparedValue }}.",
);
pub const TOO_LATE_OR_EQUAL: ErrorCode = ErrorCode::from_static(
    "is too late or equal",
    "This value should be earlier than {{ comparedValue }}.",
);
pub const TOO_LONG: ErrorCode = ErrorCode::from_static(
    "is too long",
    "This value is too long. It should have {{ limit }} character(s) or less.",
);
pub const TOO_LOW: ErrorCode = ErrorCode::from_static(
    "is too low",
    "This value should be greater than or equal to {{ comparedValue }}.",
);
pub const TOO_LOW_OR_EQUAL: ErrorCode = ErrorCode::from_static(
    "is too low or equal",
    "This value should be greater than {{ comparedValue }}.",
);
pub const TOO_MANY_ELEMENTS: ErrorCode = ErrorCode::from_static(
    "too many elements",
    "This collection should contain {{ limit }} element(s) or less.",
);
pub const TOO_SHORT: ErrorCode = ErrorCode::from_static(
    "is too short",
    "This value is too short. It should have {{ limit }} character(s) or more.",
);
