//! Error types for validation.
//!
//! Validation produces two disjoint kinds of failure:
//!
//! - **violations** ([`Violation`], [`ViolationList`]): rule failures that are
//!   collected and reported together, never aborting sibling checks
//! - **faults** ([`ConstraintError`], [`PathError`](crate::PathError), cancellation
//!   and foreign errors): execution errors that abort the whole validation call
//!
//! Both travel through the single [`Error`] type; [`ViolationList::append_from_error`]
//! is where a result is re-classified into one kind or the other.

mod builder;
pub mod code;
mod fault;
mod violation;
mod violation_list;

pub use builder::{ViolationBuilder, ViolationListBuilder, ViolationListElementBuilder};
pub use code::ErrorCode;
pub use fault::{ConstraintError, Error};
pub use violation::{BuiltinViolationFactory, Violation, ViolationFactory};
pub use violation_list::ViolationList;
