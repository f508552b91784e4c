//! The aggregated list of violations produced by a validation call.

use std::collections::linked_list::{self, LinkedList};
use std::fmt::{self, Display};

use serde_json::Value;
use stillwater::prelude::*;
use stillwater::Validation;

use crate::path::PropertyPath;

use super::code::ErrorCode;
use super::fault::Error;
use super::violation::Violation;

/// An ordered, append-only collection of violations.
///
/// Appending a violation and joining another list are both constant time;
/// joining splices the other list onto the tail. Iteration yields violations
/// in the order they were appended.
///
/// An empty list is a valid value but never a failure: use
/// [`into_result`](Self::into_result) to turn a list into the outcome of a
/// validation call.
///
/// # Combining Lists
///
/// `ViolationList` implements `Semigroup`, so results from independent
/// validations can be combined:
///
/// ```rust
/// use inquest::{code, PropertyPath, Violation, ViolationList};
/// use stillwater::prelude::*;
///
/// let at = |name: &str| {
///     Violation::new(code::IS_BLANK, "blank", "blank", Vec::new(), PropertyPath::root().with_property(name))
/// };
///
/// let combined = ViolationList::from(at("name")).combine(ViolationList::from(at("email")));
/// assert_eq!(combined.len(), 2);
/// assert_eq!(
///     combined.to_string(),
///     r#"violations: #0 at "name": "blank"; #1 at "email": "blank""#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViolationList {
    violations: LinkedList<Violation>,
}

impl ViolationList {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if the list holds no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Appends one violation.
    pub fn append(&mut self, violation: Violation) {
        self.violations.push_back(violation);
    }

    /// Moves every violation of `other` to the end of this list.
    pub fn join(&mut self, mut other: ViolationList) {
        self.violations.append(&mut other.violations);
    }

    /// Returns the first violation.
    pub fn first(&self) -> Option<&Violation> {
        self.violations.front()
    }

    /// Returns the last violation.
    pub fn last(&self) -> Option<&Violation> {
        self.violations.back()
    }

    /// Returns an iterator over the violations in order.
    pub fn iter(&self) -> linked_list::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Calls `f` with the position and value of every violation.
    ///
    /// Stops at, and returns, the first error returned by `f`.
    pub fn for_each<E, F>(&self, mut f: F) -> Result<(), E>
    where
        F: FnMut(usize, &Violation) -> Result<(), E>,
    {
        self.violations
            .iter()
            .enumerate()
            .try_for_each(|(i, violation)| f(i, violation))
    }

    /// Merges the violations carried by `error` into this list.
    ///
    /// A single violation is appended and a list is joined, including when
    /// they are wrapped in [`Error::Other`] at any depth of its `source`
    /// chain. Any other error is a fault and is handed back unchanged.
    pub fn append_from_error(&mut self, error: Error) -> Result<(), Error> {
        match error {
            Error::Violation(violation) => {
                self.append(*violation);
                Ok(())
            }
            Error::Violations(violations) => {
                self.join(violations);
                Ok(())
            }
            other => match other.violations() {
                Some(violations) => {
                    self.join(violations);
                    Ok(())
                }
                None => Err(other),
            },
        }
    }

    /// Merges a validation result; success is a no-op.
    pub fn append_from_result(&mut self, result: Result<(), Error>) -> Result<(), Error> {
        match result {
            Ok(()) => Ok(()),
            Err(error) => self.append_from_error(error),
        }
    }

    /// Splits a validation result into its violations, propagating faults.
    pub fn from_result(result: Result<(), Error>) -> Result<Self, Error> {
        let mut violations = Self::new();
        violations.append_from_result(result)?;
        Ok(violations)
    }

    /// Returns true if any violation has the given code.
    pub fn is(&self, code: &ErrorCode) -> bool {
        self.violations.iter().any(|violation| violation.is(code))
    }

    /// Returns a new list with the violations matching any of the given codes.
    pub fn filter(&self, codes: &[ErrorCode]) -> Self {
        self.violations
            .iter()
            .filter(|violation| codes.iter().any(|code| violation.is(code)))
            .cloned()
            .collect()
    }

    /// Returns all violations at the specified path.
    pub fn at_path(&self, path: &PropertyPath) -> Vec<&Violation> {
        self.violations
            .iter()
            .filter(|violation| violation.property_path() == path)
            .collect()
    }

    /// Converts the list into a validation outcome: `Ok` when empty.
    pub fn into_result(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::Violations(self))
        }
    }

    /// Converts the list into a `Validation`, succeeding with `value` when empty.
    pub fn into_validation<T>(self, value: T) -> Validation<T, ViolationList> {
        if self.is_empty() {
            Validation::Success(value)
        } else {
            Validation::Failure(self)
        }
    }

    /// Copies the violations into a vector.
    pub fn to_vec(&self) -> Vec<Violation> {
        self.violations.iter().cloned().collect()
    }

    /// Converts this list into a `Vec<Violation>`.
    pub fn into_vec(self) -> Vec<Violation> {
        self.violations.into_iter().collect()
    }

    /// Serializes the list as an array of `{"propertyPath", "error", "message"}`.
    pub fn to_json(&self) -> Value {
        Value::Array(self.violations.iter().map(Violation::to_json).collect())
    }

    /// Serializes the list to a JSON string.
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }

    fn write(&self, f: &mut fmt::Formatter<'_>, delimiter: &str) -> fmt::Result {
        match self.violations.front() {
            None => f.write_str(
                "the list of violations is empty, it looks like you forgot to use into_result somewhere",
            ),
            Some(violation) if self.len() == 1 => Display::fmt(violation, f),
            Some(_) => {
                f.write_str("violations:")?;
                for (i, violation) in self.violations.iter().enumerate() {
                    if i > 0 {
                        f.write_str(";")?;
                    }
                    write!(f, "{}#{}", delimiter, i)?;
                    if !violation.property_path().is_root() {
                        write!(f, " at \"{}\"", violation.property_path())?;
                    }
                    write!(f, ": \"{}\"", violation.message())?;
                }
                Ok(())
            }
        }
    }
}

impl Display for ViolationList {
    /// Formats the list on one line, or one violation per line with `{:#}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            self.write(f, "\n\t")
        } else {
            self.write(f, " ")
        }
    }
}

impl std::error::Error for ViolationList {}

impl Semigroup for ViolationList {
    fn combine(mut self, other: Self) -> Self {
        self.join(other);
        self
    }
}

impl From<Violation> for ViolationList {
    fn from(violation: Violation) -> Self {
        let mut violations = Self::new();
        violations.append(violation);
        violations
    }
}

impl From<Vec<Violation>> for ViolationList {
    fn from(violations: Vec<Violation>) -> Self {
        violations.into_iter().collect()
    }
}

impl FromIterator<Violation> for ViolationList {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

impl Extend<Violation> for ViolationList {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        self.violations.extend(iter);
    }
}

impl IntoIterator for ViolationList {
    type Item = Violation;
    type IntoIter = linked_list::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ViolationList {
    type Item = &'a Violation;
    type IntoIter = linked_list::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ViolationList>();
    assert_sync::<ViolationList>();
};
