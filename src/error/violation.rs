//! Single violations and the factory that creates them.

use std::fmt::{self, Display};

use serde_json::{json, Map, Value};

use crate::message::{render_message, TemplateParameter};
use crate::path::PropertyPath;

use super::code::ErrorCode;

/// A single failed rule with full context.
///
/// `Violation` captures all relevant information about a rule failure:
/// - **code**: The kind of failure, for programmatic handling
/// - **message**: The rendered, human-readable description
/// - **message template** and **parameters**: What the message was rendered from
/// - **property path**: Where in the validated graph the failure occurred
///
/// Violations are created by a [`ViolationFactory`], normally through the
/// builders on [`Validator`](crate::Validator) so that the current path
/// prefix is attached automatically.
///
/// # Example
///
/// ```rust
/// use inquest::{code, PropertyPath, Violation};
///
/// let violation = Violation::new(
///     code::IS_BLANK,
///     "This value should not be blank.",
///     "This value should not be blank.",
///     Vec::new(),
///     PropertyPath::root().with_property("email"),
/// );
///
/// assert!(violation.is(&code::IS_BLANK));
/// assert_eq!(
///     violation.to_string(),
///     r#"violation at "email": "This value should not be blank.""#
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    code: ErrorCode,
    message: String,
    message_template: String,
    parameters: Vec<TemplateParameter>,
    property_path: PropertyPath,
}

impl Violation {
    /// Creates a violation from already rendered parts.
    pub fn new(
        code: ErrorCode,
        message: impl Into<String>,
        message_template: impl Into<String>,
        parameters: Vec<TemplateParameter>,
        property_path: PropertyPath,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            message_template: message_template.into(),
            parameters,
            property_path,
        }
    }

    /// Returns the violation kind.
    pub fn code(&self) -> &ErrorCode {
        &self.code
    }

    /// Returns the rendered message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the template the message was rendered from.
    pub fn message_template(&self) -> &str {
        &self.message_template
    }

    /// Returns the template parameters in the order they were given.
    pub fn parameters(&self) -> &[TemplateParameter] {
        &self.parameters
    }

    /// Returns the path of the value that failed.
    pub fn property_path(&self) -> &PropertyPath {
        &self.property_path
    }

    /// Returns true if this violation is of the given kind.
    pub fn is(&self, code: &ErrorCode) -> bool {
        self.code.code() == code.code()
    }

    /// Serializes the violation as `{"propertyPath", "error", "message"}`.
    ///
    /// `propertyPath` is omitted for violations at the root.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        if !self.property_path.is_root() {
            object.insert(
                "propertyPath".to_string(),
                json!(self.property_path.to_string()),
            );
        }
        object.insert("error".to_string(), json!(self.code.code()));
        object.insert("message".to_string(), json!(self.message));
        Value::Object(object)
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "violation")?;
        if !self.property_path.is_root() {
            write!(f, " at \"{}\"", self.property_path)?;
        }
        write!(f, ": \"{}\"", self.message)
    }
}

impl std::error::Error for Violation {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.code)
    }
}

// Violations cross thread boundaries when parallel arguments merge results.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Violation>();
    assert_sync::<Violation>();
};

/// Creates violations from their raw parts.
///
/// Swap the factory on a [`Validator`](crate::Validator) to change how
/// messages are rendered, e.g. to translate templates before substitution.
/// Any `Fn` with the matching signature is a factory.
pub trait ViolationFactory: Send + Sync {
    /// Creates a violation with a fully resolved property path.
    fn create_violation(
        &self,
        code: ErrorCode,
        message_template: &str,
        parameters: Vec<TemplateParameter>,
        property_path: PropertyPath,
    ) -> Violation;
}

impl<F> ViolationFactory for F
where
    F: Fn(ErrorCode, &str, Vec<TemplateParameter>, PropertyPath) -> Violation + Send + Sync,
{
    fn create_violation(
        &self,
        code: ErrorCode,
        message_template: &str,
        parameters: Vec<TemplateParameter>,
        property_path: PropertyPath,
    ) -> Violation {
        self(code, message_template, parameters, property_path)
    }
}

/// The default factory: renders the template with its parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuiltinViolationFactory;

impl ViolationFactory for BuiltinViolationFactory {
    fn create_violation(
        &self,
        code: ErrorCode,
        message_template: &str,
        parameters: Vec<TemplateParameter>,
        property_path: PropertyPath,
    ) -> Violation {
        let message = render_message(message_template, &parameters);
        Violation::new(code, message, message_template, parameters, property_path)
    }
}
