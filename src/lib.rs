//! # Inquest
//!
//! A rule-execution engine that runs a tree of validation checks against a
//! value graph and reports every failure, each located by a property path,
//! instead of stopping at the first one.
//!
//! ## Overview
//!
//! Validation is declared as a list of [`Argument`]s: a value, the
//! constraints to check it against and the path where it lives. A
//! [`Validator`] runs the arguments and joins their violations into one
//! [`ViolationList`]. Execution errors (a misconfigured constraint, a
//! cancelled context, a foreign error) are kept apart from violations and
//! abort the call.
//!
//! ## Core Types
//!
//! - [`PropertyPath`]: where in the value graph a violation occurred (e.g. `users[0].email`)
//! - [`Violation`] / [`ViolationList`]: located rule failures and their ordered collection
//! - [`Error`]: the single error type, either violations or a fault
//! - [`Validator`]: runs arguments with a path prefix, groups and a violation factory
//! - [`ValidationContext`]: cancellation shared by everything a call runs
//!
//! Arguments and combinators live in [`argument`]; the built-in constraints
//! live in [`constraint`].
//!
//! ## Example
//!
//! ```rust
//! use inquest::{arguments, code, ValidationContext, Validator};
//! use inquest::argument::{number_property, string_property};
//! use inquest::constraint::{is_one_of, of_string_by};
//!
//! let result = Validator::new().validate(
//!     &ValidationContext::background(),
//!     &arguments![
//!         string_property("email", "bad").with(of_string_by(|s| s.contains('@'))),
//!         number_property("age", 17).with(is_one_of([18, 21, 30, 40])),
//!     ],
//! );
//!
//! let violations = result.unwrap_err().violations().unwrap();
//! assert_eq!(violations.len(), 2);
//! assert!(violations.is(&code::NO_SUCH_CHOICE));
//! assert_eq!(
//!     violations.to_json_string(),
//!     r#"[{"error":"is not valid","message":"This value is not valid.","propertyPath":"email"},{"error":"no such choice","message":"The value you selected is not a valid choice.","propertyPath":"age"}]"#
//! );
//! ```

pub mod argument;
pub mod constraint;
pub mod error;
pub mod message;
pub mod path;
pub mod validation;
pub mod validator;

pub use argument::{Argument, Arguments, ExecutionContext, Validatable};
pub use error::{
    code, ConstraintError, Error, ErrorCode, Violation, ViolationFactory, ViolationList,
};
pub use path::{PathElement, PathError, PropertyPath};
pub use validation::{CancelHandle, ValidationContext};
pub use validator::{Validator, DEFAULT_GROUP};

/// Type alias for validation results that carry violations on failure.
pub type ValidationResult<T> = stillwater::Validation<T, ViolationList>;
