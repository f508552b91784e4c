//! The crate error type and constraint configuration faults.

use std::fmt::{self, Display};
use std::sync::Arc;

use thiserror::Error as ThisError;

use crate::path::{PathError, PropertyPath};

use super::violation::Violation;
use super::violation_list::ViolationList;

/// The error returned by validation closures and [`Validator::validate`](crate::Validator::validate).
///
/// `Violation` and `Violations` are soft failures: they are merged into the
/// enclosing result. Every other variant is a fault that aborts the enclosing
/// validation call and is returned as-is.
#[derive(Debug, Clone, ThisError)]
pub enum Error {
    /// A single rule failure.
    #[error(transparent)]
    Violation(Box<Violation>),
    /// Several rule failures.
    #[error(transparent)]
    Violations(ViolationList),
    /// A constraint was configured in a way that cannot be evaluated.
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
    /// A property path could not be decoded.
    #[error(transparent)]
    Path(#[from] PathError),
    /// The validation context was cancelled before the call finished.
    #[error("validation was cancelled")]
    Cancelled,
    /// Any other error raised by caller code.
    #[error("{0}")]
    Other(Arc<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wraps a foreign error.
    ///
    /// A [`Violation`] or [`ViolationList`] anywhere in the wrapped error's
    /// `source` chain is still recognised as a violation when the result is
    /// merged.
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Other(Arc::new(error))
    }

    /// Returns true if this error carries rule failures rather than a fault.
    pub fn is_violation(&self) -> bool {
        self.violations().is_some()
    }

    /// Returns true if this error must abort validation.
    pub fn is_fault(&self) -> bool {
        !self.is_violation()
    }

    /// Returns the carried violations, or None for a fault.
    ///
    /// Wrapped errors are unwrapped: the `source` chain of [`Error::Other`] is
    /// followed until a [`Violation`], a [`ViolationList`] or a nested
    /// [`Error`] is found.
    pub fn violations(&self) -> Option<ViolationList> {
        match self {
            Error::Violation(violation) => Some(ViolationList::from((**violation).clone())),
            Error::Violations(violations) => Some(violations.clone()),
            Error::Other(inner) => find_violations(&**inner),
            _ => None,
        }
    }
}

fn find_violations(error: &(dyn std::error::Error + 'static)) -> Option<ViolationList> {
    let mut current = Some(error);
    while let Some(error) = current {
        if let Some(violation) = error.downcast_ref::<Violation>() {
            return Some(ViolationList::from(violation.clone()));
        }
        if let Some(violations) = error.downcast_ref::<ViolationList>() {
            return Some(violations.clone());
        }
        if let Some(nested) = error.downcast_ref::<Error>() {
            return nested.violations();
        }
        current = error.source();
    }
    None
}

impl From<Violation> for Error {
    fn from(violation: Violation) -> Self {
        Error::Violation(Box::new(violation))
    }
}

impl From<ViolationList> for Error {
    fn from(violations: ViolationList) -> Self {
        Error::Violations(violations)
    }
}

/// A constraint that cannot be evaluated as configured.
///
/// Raised for misuse such as an empty choice set, a non-positive divisor or
/// an invalid regular expression.
///
/// # Example
///
/// ```rust
/// use inquest::{ConstraintError, PropertyPath};
///
/// let err = ConstraintError::new(
///     "ChoiceConstraint",
///     PropertyPath::root().with_property("role"),
///     "empty list of choices",
/// );
/// assert_eq!(
///     err.to_string(),
///     r#"validate by ChoiceConstraint at path "role": empty list of choices"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintError {
    /// Name of the misconfigured constraint.
    pub constraint_name: String,
    /// Path of the value being validated.
    pub path: PropertyPath,
    /// What is wrong with the configuration.
    pub description: String,
}

impl ConstraintError {
    pub fn new(
        constraint_name: impl Into<String>,
        path: PropertyPath,
        description: impl Into<String>,
    ) -> Self {
        Self {
            constraint_name: constraint_name.into(),
            path,
            description: description.into(),
        }
    }
}

impl Display for ConstraintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validate by {}", self.constraint_name)?;
        if !self.path.is_root() {
            write!(f, " at path \"{}\"", self.path)?;
        }
        write!(f, ": {}", self.description)
    }
}

impl std::error::Error for ConstraintError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Error>();
    assert_sync::<Error>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;

    #[derive(Debug, ThisError)]
    #[error("storage unavailable")]
    struct StorageError;

    fn violation() -> Violation {
        Violation::new(code::NOT_VALID, "m", "m", Vec::new(), PropertyPath::root())
    }

    #[test]
    fn test_classification() {
        assert!(Error::from(violation()).is_violation());
        assert!(Error::from(ViolationList::from(violation())).is_violation());
        assert!(Error::Cancelled.is_fault());
        assert!(Error::other(StorageError).is_fault());
        assert!(Error::from(ConstraintError::new("X", PropertyPath::root(), "bad")).is_fault());
    }

    #[test]
    fn test_wrapped_violation_is_not_a_fault() {
        let err = Error::other(violation());
        assert!(err.is_violation());
        assert_eq!(err.violations().map(|list| list.len()), Some(1));
    }

    #[derive(Debug, ThisError)]
    #[error("loading user")]
    struct LoadError {
        #[source]
        cause: Violation,
    }

    #[derive(Debug, ThisError)]
    #[error("loading user")]
    struct LoadFault {
        #[source]
        cause: StorageError,
    }

    #[test]
    fn test_violation_in_source_chain_is_not_a_fault() {
        let err = Error::other(LoadError { cause: violation() });
        assert!(err.is_violation());
        assert_eq!(err.violations().map(|list| list.len()), Some(1));

        assert!(Error::other(LoadFault { cause: StorageError }).is_fault());
    }

    #[test]
    fn test_nested_error_is_unwrapped() {
        let err = Error::other(Error::other(Error::from(violation())));
        assert!(err.is_violation());
        assert!(Error::other(Error::Cancelled).is_fault());
    }

    #[test]
    fn test_fault_has_no_violations() {
        assert!(Error::other(StorageError).violations().is_none());
        assert_eq!(Error::other(StorageError).to_string(), "storage unavailable");
    }

    #[test]
    fn test_constraint_error_at_root() {
        let err = ConstraintError::new("DivisibleConstraint", PropertyPath::root(), "zero divisor");
        assert_eq!(err.to_string(), "validate by DivisibleConstraint: zero divisor");
    }
}
