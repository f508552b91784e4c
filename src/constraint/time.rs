//! Time comparison and date/time string format constraints.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};

use crate::error::{code, Error, ErrorCode};
use crate::validation::ValidationContext;
use crate::validator::Validator;

use super::{impl_constraint_options, parameter, BaseConstraint, StringConstraint, TimeConstraint};

const RFC3339_LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%:z";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Order {
    Earlier,
    EarlierOrEqual,
    Later,
    LaterOrEqual,
}

/// Compares a time against a fixed instant.
#[derive(Debug, Clone)]
pub struct TimeComparisonConstraint {
    base: BaseConstraint,
    compared: DateTime<Utc>,
    order: Order,
}

fn time_comparison(compared: DateTime<Utc>, order: Order, code: ErrorCode) -> TimeComparisonConstraint {
    TimeComparisonConstraint {
        base: BaseConstraint::new(code),
        compared,
        order,
    }
}

/// Requires a time strictly before `value`; reports [`code::TOO_LATE_OR_EQUAL`].
pub fn is_earlier_than(value: DateTime<Utc>) -> TimeComparisonConstraint {
    time_comparison(value, Order::Earlier, code::TOO_LATE_OR_EQUAL)
}

/// Requires a time at or before `value`; reports [`code::TOO_LATE`].
pub fn is_earlier_than_or_equal(value: DateTime<Utc>) -> TimeComparisonConstraint {
    time_comparison(value, Order::EarlierOrEqual, code::TOO_LATE)
}

/// Requires a time strictly after `value`; reports [`code::TOO_EARLY_OR_EQUAL`].
pub fn is_later_than(value: DateTime<Utc>) -> TimeComparisonConstraint {
    time_comparison(value, Order::Later, code::TOO_EARLY_OR_EQUAL)
}

/// Requires a time at or after `value`; reports [`code::TOO_EARLY`].
pub fn is_later_than_or_equal(value: DateTime<Utc>) -> TimeComparisonConstraint {
    time_comparison(value, Order::LaterOrEqual, code::TOO_EARLY)
}

impl TimeComparisonConstraint {
    impl_constraint_options!();
}

impl TimeConstraint for TimeComparisonConstraint {
    fn validate_time(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&DateTime<Utc>>,
    ) -> Result<(), Error> {
        let value = match value {
            Some(value) if !self.base.should_skip(validator) => value,
            _ => return Ok(()),
        };

        let holds = match self.order {
            Order::Earlier => *value < self.compared,
            Order::EarlierOrEqual => *value <= self.compared,
            Order::Later => *value > self.compared,
            Order::LaterOrEqual => *value >= self.compared,
        };
        if holds {
            return Ok(());
        }
        Err(self.base.violation(
            validator,
            [
                parameter(
                    "{{ comparedValue }}",
                    self.compared.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                ),
                parameter("{{ value }}", value.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            ],
        ))
    }
}

/// Requires a string that parses with a date/time layout.
///
/// Layouts use `chrono` strftime syntax. Empty strings are accepted.
#[derive(Debug, Clone)]
pub struct DateTimeConstraint {
    base: BaseConstraint,
    layout: Option<String>,
}

/// Requires an RFC 3339 date-time; reports [`code::INVALID_DATE_TIME`].
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, ValidationContext, Validator};
/// use inquest::argument::string_property;
/// use inquest::constraint::is_date_time;
///
/// let validator = Validator::new();
/// let ctx = ValidationContext::background();
///
/// assert!(validator
///     .validate(&ctx, &arguments![string_property("at", "2024-02-29T10:00:00Z").with(is_date_time())])
///     .is_ok());
/// assert!(validator
///     .validate(&ctx, &arguments![string_property("at", "yesterday").with(is_date_time())])
///     .is_err());
/// ```
pub fn is_date_time() -> DateTimeConstraint {
    DateTimeConstraint {
        base: BaseConstraint::new(code::INVALID_DATE_TIME),
        layout: None,
    }
}

/// Requires a `YYYY-MM-DD` date; reports [`code::INVALID_DATE`].
pub fn is_date() -> DateTimeConstraint {
    DateTimeConstraint {
        base: BaseConstraint::new(code::INVALID_DATE),
        layout: Some("%Y-%m-%d".to_string()),
    }
}

/// Requires an `HH:MM:SS` time; reports [`code::INVALID_TIME`].
pub fn is_time() -> DateTimeConstraint {
    DateTimeConstraint {
        base: BaseConstraint::new(code::INVALID_TIME),
        layout: Some("%H:%M:%S".to_string()),
    }
}

impl DateTimeConstraint {
    impl_constraint_options!();

    /// Parses with a custom strftime layout instead.
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    fn layout(&self) -> &str {
        self.layout.as_deref().unwrap_or(RFC3339_LAYOUT)
    }

    fn parses(&self, value: &str) -> bool {
        match self.layout.as_deref() {
            None => DateTime::parse_from_rfc3339(value).is_ok(),
            Some(layout) => {
                NaiveDateTime::parse_from_str(value, layout).is_ok()
                    || NaiveDate::parse_from_str(value, layout).is_ok()
                    || NaiveTime::parse_from_str(value, layout).is_ok()
                    || DateTime::parse_from_str(value, layout).is_ok()
            }
        }
    }
}

impl StringConstraint for DateTimeConstraint {
    fn validate_string(
        &self,
        _ctx: &ValidationContext,
        validator: &Validator,
        value: Option<&str>,
    ) -> Result<(), Error> {
        match value {
            Some(value)
                if !value.is_empty() && !self.base.should_skip(validator) && !self.parses(value) =>
            {
                Err(self.base.violation(
                    validator,
                    [
                        parameter("{{ layout }}", self.layout()),
                        parameter("{{ value }}", value),
                    ],
                ))
            }
            _ => Ok(()),
        }
    }
}
