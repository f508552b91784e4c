//! The validator facade that runs validation arguments.
//!
//! A [`Validator`] owns the violation factory, the current property path
//! prefix and the active validation groups. It is never mutated: every
//! `with_*` and `at*` method returns a new validator sharing the factory.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::argument::{self, Argument, ExecutionContext, Validatable};
use crate::constraint::{
    BoolConstraint, ComparablesConstraint, CountableConstraint, NumberConstraint, Numeric,
    StringConstraint, TimeConstraint,
};
use crate::error::{
    BuiltinViolationFactory, ConstraintError, Error, ErrorCode, Violation, ViolationBuilder,
    ViolationFactory, ViolationList, ViolationListBuilder,
};
use crate::path::{PathElement, PropertyPath};
use crate::validation::ValidationContext;

/// The group every rule belongs to when no group is given.
pub const DEFAULT_GROUP: &str = "default";

/// Runs validation arguments and builds violations.
///
/// # Example
///
/// ```rust
/// use inquest::{arguments, Validator, ValidationContext};
/// use inquest::argument::string_property;
/// use inquest::constraint::is_not_blank;
///
/// let validator = Validator::new();
/// let result = validator.validate(
///     &ValidationContext::background(),
///     &arguments![string_property("name", "").with(is_not_blank())],
/// );
///
/// let err = result.unwrap_err();
/// assert_eq!(err.to_string(), r#"violation at "name": "This value should not be blank.""#);
/// ```
#[derive(Clone)]
pub struct Validator {
    path: PropertyPath,
    factory: Arc<dyn ViolationFactory>,
    groups: Arc<[String]>,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            path: PropertyPath::root(),
            factory: Arc::new(BuiltinViolationFactory),
            groups: Arc::from(Vec::new()),
        }
    }
}

impl std::fmt::Debug for Validator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator")
            .field("path", &self.path)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

impl Validator {
    /// Creates a validator at the root path using the builtin violation factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a validator that creates violations with the given factory.
    pub fn with_violation_factory(&self, factory: impl ViolationFactory + 'static) -> Self {
        Self {
            factory: Arc::new(factory),
            ..self.clone()
        }
    }

    /// Returns a validator that applies only rules of the given groups.
    pub fn with_groups<I, S>(&self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            groups: groups.into_iter().map(Into::into).collect(),
            ..self.clone()
        }
    }

    /// Returns the active groups.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Returns the current property path prefix.
    pub fn property_path(&self) -> &PropertyPath {
        &self.path
    }

    /// Returns a validator with the elements appended to the path prefix.
    pub fn at<I>(&self, elements: I) -> Self
    where
        I: IntoIterator<Item = PathElement>,
    {
        Self {
            path: self.path.with(elements),
            ..self.clone()
        }
    }

    /// Returns a validator with a property element appended to the path prefix.
    pub fn at_property(&self, name: impl Into<String>) -> Self {
        Self {
            path: self.path.with_property(name),
            ..self.clone()
        }
    }

    /// Returns a validator with an index element appended to the path prefix.
    pub fn at_index(&self, index: usize) -> Self {
        Self {
            path: self.path.with_index(index),
            ..self.clone()
        }
    }

    /// Returns true if rules declared for `groups` apply to this validator.
    ///
    /// Without explicit groups the validator applies to rules with no groups
    /// or with the default group. With explicit groups it applies to rules
    /// sharing any group, and to rules with no groups when the default group
    /// is among its own.
    pub fn is_applied_for_groups<S: AsRef<str>>(&self, groups: &[S]) -> bool {
        if self.groups.is_empty() {
            return groups.is_empty() || groups.iter().any(|g| g.as_ref() == DEFAULT_GROUP);
        }

        self.groups.iter().any(|own| {
            (groups.is_empty() && own == DEFAULT_GROUP)
                || groups.iter().any(|g| g.as_ref() == own)
        })
    }

    /// Returns true if rules declared for `groups` are skipped by this validator.
    pub fn is_ignored_for_groups<S: AsRef<str>>(&self, groups: &[S]) -> bool {
        !self.is_applied_for_groups(groups)
    }

    /// Creates a fault for a misconfigured constraint at the current path.
    pub fn create_constraint_error(
        &self,
        constraint_name: impl Into<String>,
        description: impl Into<String>,
    ) -> ConstraintError {
        ConstraintError::new(constraint_name, self.path.clone(), description)
    }

    /// Creates a violation without parameters at the given sub-path.
    pub fn create_violation<I>(
        &self,
        code: ErrorCode,
        message_template: impl Into<String>,
        elements: I,
    ) -> Violation
    where
        I: IntoIterator<Item = PathElement>,
    {
        self.build_violation(code, message_template)
            .at(elements)
            .create()
    }

    /// Starts building a violation at the current path.
    pub fn build_violation(
        &self,
        code: ErrorCode,
        message_template: impl Into<String>,
    ) -> ViolationBuilder {
        ViolationBuilder::new(Arc::clone(&self.factory), code, message_template)
            .set_property_path(self.path.clone())
    }

    /// Starts building a list of violations at the current path.
    pub fn build_violation_list(&self) -> ViolationListBuilder {
        ViolationListBuilder::new(Arc::clone(&self.factory)).set_property_path(self.path.clone())
    }

    /// Validates a single string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::sync::Arc;
    /// use inquest::{ValidationContext, Validator};
    /// use inquest::constraint::{has_min_length, is_not_blank};
    ///
    /// let err = Validator::new()
    ///     .at_property("login")
    ///     .validate_string(
    ///         &ValidationContext::background(),
    ///         "ab",
    ///         &[Arc::new(is_not_blank()), Arc::new(has_min_length(3))],
    ///     )
    ///     .unwrap_err();
    /// assert_eq!(err.violations().unwrap().len(), 1);
    /// ```
    pub fn validate_string(
        &self,
        ctx: &ValidationContext,
        value: impl Into<String>,
        constraints: &[Arc<dyn StringConstraint>],
    ) -> Result<(), Error> {
        self.validate_one(ctx, argument::string(value).with_all(constraints.iter().cloned()))
    }

    /// Validates every string of a list at its index.
    pub fn validate_each_string<I, S>(
        &self,
        ctx: &ValidationContext,
        values: I,
        constraints: &[Arc<dyn StringConstraint>],
    ) -> Result<(), Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validate_one(ctx, argument::each_string(values).with_all(constraints.iter().cloned()))
    }

    /// Validates a list of strings as a whole.
    pub fn validate_strings(
        &self,
        ctx: &ValidationContext,
        values: Vec<String>,
        constraints: &[Arc<dyn ComparablesConstraint<String>>],
    ) -> Result<(), Error> {
        self.validate_one(ctx, argument::comparables(values).with_all(constraints.iter().cloned()))
    }

    /// Validates a single number of any [`Numeric`] kind.
    pub fn validate_number<T: Numeric>(
        &self,
        ctx: &ValidationContext,
        value: T,
        constraints: &[Arc<dyn NumberConstraint<T>>],
    ) -> Result<(), Error> {
        self.validate_one(ctx, argument::number(value).with_all(constraints.iter().cloned()))
    }

    pub fn validate_bool(
        &self,
        ctx: &ValidationContext,
        value: bool,
        constraints: &[Arc<dyn BoolConstraint>],
    ) -> Result<(), Error> {
        self.validate_one(ctx, argument::boolean(value).with_all(constraints.iter().cloned()))
    }

    /// Validates the number of elements of a collection.
    pub fn validate_countable(
        &self,
        ctx: &ValidationContext,
        count: usize,
        constraints: &[Arc<dyn CountableConstraint>],
    ) -> Result<(), Error> {
        self.validate_one(ctx, argument::countable(count).with_all(constraints.iter().cloned()))
    }

    pub fn validate_time(
        &self,
        ctx: &ValidationContext,
        value: DateTime<Utc>,
        constraints: &[Arc<dyn TimeConstraint>],
    ) -> Result<(), Error> {
        self.validate_one(ctx, argument::time(value).with_all(constraints.iter().cloned()))
    }

    fn validate_one<A: Argument + 'static>(
        &self,
        ctx: &ValidationContext,
        single: A,
    ) -> Result<(), Error> {
        let arguments: [Arc<dyn Argument>; 1] = [Arc::new(single)];
        self.validate(ctx, &arguments)
    }

    /// Validates a value that knows how to validate itself.
    pub fn validate_it<V>(&self, ctx: &ValidationContext, value: &V) -> Result<(), Error>
    where
        V: Validatable + ?Sized,
    {
        ViolationList::from_result(value.validate(ctx, self))?.into_result()
    }

    /// Runs the arguments and returns every violation they produce.
    ///
    /// Each argument registers its checks first; the checks then run in
    /// declaration order and their violations are joined. A fault aborts the
    /// call and is returned unchanged, as is [`Error::Cancelled`] when `ctx`
    /// is cancelled before a check starts.
    pub fn validate(
        &self,
        ctx: &ValidationContext,
        arguments: &[Arc<dyn Argument>],
    ) -> Result<(), Error> {
        let mut execution = ExecutionContext::new();
        for argument in arguments {
            argument.set_up(&mut execution);
        }
        trace!(
            path = %self.path,
            checks = execution.len(),
            "running registered checks"
        );

        let mut violations = ViolationList::new();
        for (validate, elements) in execution.validations() {
            ctx.check()?;
            let validator = self.at(elements.iter().cloned());
            match validate(ctx, &validator) {
                Ok(found) => violations.join(found),
                Err(err) => {
                    if let Err(fault) = violations.append_from_error(err) {
                        debug!(path = %validator.path, error = %fault, "validation aborted by fault");
                        return Err(fault);
                    }
                }
            }
        }

        violations.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;

    const NONE: &[&str] = &[];

    fn codes(result: Result<(), Error>) -> Vec<String> {
        result
            .err()
            .and_then(|err| err.violations())
            .map(|list| list.iter().map(|v| v.code().code().to_string()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_typed_shortcuts() {
        use crate::constraint::{
            has_min_count, has_min_length, has_unique_values, is_blank, is_not_blank,
            is_positive,
        };
        use chrono::TimeZone;

        let ctx = ValidationContext::background();
        let validator = Validator::new().at_property("field");

        assert_eq!(
            codes(validator.validate_string(
                &ctx,
                "ab",
                &[Arc::new(is_not_blank()), Arc::new(has_min_length(3))],
            )),
            vec!["is too short"]
        );
        assert_eq!(
            codes(validator.validate_number(&ctx, -2_i64, &[Arc::new(is_positive())])),
            vec!["is not positive"]
        );
        assert_eq!(
            codes(validator.validate_bool(&ctx, true, &[Arc::new(is_blank())])),
            vec!["is not blank"]
        );
        assert_eq!(
            codes(validator.validate_countable(&ctx, 0, &[Arc::new(has_min_count(1))])),
            vec!["too few elements"]
        );
        assert_eq!(
            codes(validator.validate_strings(
                &ctx,
                vec!["a".to_string(), "a".to_string()],
                &[Arc::new(has_unique_values())],
            )),
            vec!["is not unique"]
        );
        let epoch = chrono::Utc.timestamp_opt(0, 0).unwrap();
        assert_eq!(
            codes(validator.validate_time(&ctx, epoch, &[Arc::new(is_not_blank())])),
            vec!["is blank"]
        );
    }

    #[test]
    fn test_each_string_shortcut_locates_elements() {
        use crate::constraint::is_not_blank;

        let err = Validator::new()
            .at_property("tags")
            .validate_each_string(
                &ValidationContext::background(),
                ["x", ""],
                &[Arc::new(is_not_blank())],
            )
            .unwrap_err();
        let violations = err.violations().unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations.first().unwrap().property_path().to_string(),
            "tags[1]"
        );
    }

    #[test]
    fn test_derivation_does_not_mutate_parent() {
        let parent = Validator::new().at_property("user");
        let child = parent.at_index(2).with_groups(["admin"]);

        assert_eq!(parent.property_path().to_string(), "user");
        assert!(parent.groups().is_empty());
        assert_eq!(child.property_path().to_string(), "user[2]");
        assert_eq!(child.groups().to_vec(), vec!["admin".to_string()]);
    }

    #[test]
    fn test_groups_without_explicit_groups() {
        let validator = Validator::new();
        assert!(validator.is_applied_for_groups(NONE));
        assert!(validator.is_applied_for_groups(&[DEFAULT_GROUP]));
        assert!(validator.is_applied_for_groups(&["admin", DEFAULT_GROUP]));
        assert!(validator.is_ignored_for_groups(&["admin"]));
    }

    #[test]
    fn test_groups_with_explicit_groups() {
        let validator = Validator::new().with_groups(["admin", "api"]);
        assert!(validator.is_applied_for_groups(&["api"]));
        assert!(validator.is_ignored_for_groups(&["guest"]));
        assert!(validator.is_ignored_for_groups(NONE));

        let with_default = Validator::new().with_groups([DEFAULT_GROUP, "admin"]);
        assert!(with_default.is_applied_for_groups(NONE));
    }

    #[test]
    fn test_build_violation_uses_current_path() {
        let violation = Validator::new()
            .at_property("items")
            .at_index(0)
            .create_violation(code::IS_BLANK, "blank", [PathElement::property("name")]);
        assert_eq!(violation.property_path().to_string(), "items[0].name");
    }

    #[test]
    fn test_custom_factory() {
        let validator = Validator::new().with_violation_factory(
            |code: ErrorCode,
             template: &str,
             parameters: Vec<crate::message::TemplateParameter>,
             path: PropertyPath| {
                Violation::new(code, format!("translated: {}", template), template, parameters, path)
            },
        );
        let violation = validator.build_violation(code::NOT_VALID, "bad").create();
        assert_eq!(violation.message(), "translated: bad");
    }

    #[test]
    fn test_constraint_error_uses_current_path() {
        let err = Validator::new()
            .at_property("role")
            .create_constraint_error("ChoiceConstraint", "empty list of choices");
        assert_eq!(err.path.to_string(), "role");
    }

    #[test]
    fn test_validate_without_arguments() {
        let result = Validator::new().validate(&ValidationContext::background(), &[]);
        assert!(result.is_ok());
    }
}
