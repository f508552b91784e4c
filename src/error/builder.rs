//! Fluent builders for violations and violation lists.
//!
//! Builders are obtained from a [`Validator`](crate::Validator), which seeds
//! them with its violation factory and current property path.

use std::sync::Arc;

use crate::message::TemplateParameter;
use crate::path::{PathElement, PropertyPath};

use super::code::ErrorCode;
use super::violation::{Violation, ViolationFactory};
use super::violation_list::ViolationList;

/// Builds a single [`Violation`].
///
/// # Example
///
/// ```rust
/// use inquest::{code, Validator};
///
/// let validator = Validator::new().at_property("user");
/// let violation = validator
///     .build_violation(code::TOO_SHORT, code::TOO_SHORT.message())
///     .with_parameter("{{ limit }}", "3")
///     .at_property("name")
///     .create();
///
/// assert_eq!(violation.property_path().to_string(), "user.name");
/// assert!(violation.message().contains("It should have 3 character(s)"));
/// ```
pub struct ViolationBuilder {
    factory: Arc<dyn ViolationFactory>,
    code: ErrorCode,
    message_template: String,
    parameters: Vec<TemplateParameter>,
    property_path: PropertyPath,
}

impl ViolationBuilder {
    /// Creates a builder that will use the given factory.
    pub fn new(
        factory: Arc<dyn ViolationFactory>,
        code: ErrorCode,
        message_template: impl Into<String>,
    ) -> Self {
        Self {
            factory,
            code,
            message_template: message_template.into(),
            parameters: Vec::new(),
            property_path: PropertyPath::root(),
        }
    }

    /// Replaces the property path.
    pub fn set_property_path(mut self, path: PropertyPath) -> Self {
        self.property_path = path;
        self
    }

    /// Replaces the template parameters.
    pub fn with_parameters<I>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = TemplateParameter>,
    {
        self.parameters = parameters.into_iter().collect();
        self
    }

    /// Adds one template parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(TemplateParameter::new(key, value));
        self
    }

    /// Appends elements to the property path.
    pub fn at<I>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = PathElement>,
    {
        self.property_path = self.property_path.with(elements);
        self
    }

    /// Appends a property element to the property path.
    pub fn at_property(mut self, name: impl Into<String>) -> Self {
        self.property_path = self.property_path.with_property(name);
        self
    }

    /// Appends an index element to the property path.
    pub fn at_index(mut self, index: usize) -> Self {
        self.property_path = self.property_path.with_index(index);
        self
    }

    /// Creates the violation through the factory.
    pub fn create(self) -> Violation {
        self.factory.create_violation(
            self.code,
            &self.message_template,
            self.parameters,
            self.property_path,
        )
    }
}

/// Builds a [`ViolationList`] one violation at a time.
///
/// # Example
///
/// ```rust
/// use inquest::{code, PathElement, Validator};
///
/// let violations = Validator::new()
///     .build_violation_list()
///     .add_violation(code::IS_BLANK, "first is blank", [PathElement::property("first")])
///     .build_violation(code::TOO_LONG, "{{ name }} is too long")
///     .with_parameter("{{ name }}", "second")
///     .at_property("second")
///     .add()
///     .create();
///
/// assert_eq!(violations.len(), 2);
/// ```
pub struct ViolationListBuilder {
    violations: ViolationList,
    factory: Arc<dyn ViolationFactory>,
    property_path: PropertyPath,
}

impl ViolationListBuilder {
    /// Creates an empty list builder using the given factory.
    pub fn new(factory: Arc<dyn ViolationFactory>) -> Self {
        Self {
            violations: ViolationList::new(),
            factory,
            property_path: PropertyPath::root(),
        }
    }

    /// Starts building a violation that is appended by [`ViolationListElementBuilder::add`].
    pub fn build_violation(
        self,
        code: ErrorCode,
        message_template: impl Into<String>,
    ) -> ViolationListElementBuilder {
        let property_path = self.property_path.clone();
        ViolationListElementBuilder {
            list: self,
            code,
            message_template: message_template.into(),
            parameters: Vec::new(),
            property_path,
        }
    }

    /// Appends a violation without parameters at the given sub-path.
    pub fn add_violation<I>(
        self,
        code: ErrorCode,
        message_template: impl Into<String>,
        elements: I,
    ) -> Self
    where
        I: IntoIterator<Item = PathElement>,
    {
        let path = self.property_path.with(elements);
        self.add(code, &message_template.into(), Vec::new(), path)
    }

    /// Replaces the base property path for subsequent violations.
    pub fn set_property_path(mut self, path: PropertyPath) -> Self {
        self.property_path = path;
        self
    }

    /// Appends elements to the base property path.
    pub fn at<I>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = PathElement>,
    {
        self.property_path = self.property_path.with(elements);
        self
    }

    /// Appends a property element to the base property path.
    pub fn at_property(mut self, name: impl Into<String>) -> Self {
        self.property_path = self.property_path.with_property(name);
        self
    }

    /// Appends an index element to the base property path.
    pub fn at_index(mut self, index: usize) -> Self {
        self.property_path = self.property_path.with_index(index);
        self
    }

    /// Returns the accumulated list.
    pub fn create(self) -> ViolationList {
        self.violations
    }

    fn add(
        mut self,
        code: ErrorCode,
        message_template: &str,
        parameters: Vec<TemplateParameter>,
        path: PropertyPath,
    ) -> Self {
        let violation = self
            .factory
            .create_violation(code, message_template, parameters, path);
        self.violations.append(violation);
        self
    }
}

/// Builds one violation of a [`ViolationListBuilder`].
pub struct ViolationListElementBuilder {
    list: ViolationListBuilder,
    code: ErrorCode,
    message_template: String,
    parameters: Vec<TemplateParameter>,
    property_path: PropertyPath,
}

impl ViolationListElementBuilder {
    /// Replaces the template parameters.
    pub fn with_parameters<I>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = TemplateParameter>,
    {
        self.parameters = parameters.into_iter().collect();
        self
    }

    /// Adds one template parameter.
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.push(TemplateParameter::new(key, value));
        self
    }

    /// Appends elements to this violation's path.
    pub fn at<I>(mut self, elements: I) -> Self
    where
        I: IntoIterator<Item = PathElement>,
    {
        self.property_path = self.property_path.with(elements);
        self
    }

    /// Appends a property element to this violation's path.
    pub fn at_property(mut self, name: impl Into<String>) -> Self {
        self.property_path = self.property_path.with_property(name);
        self
    }

    /// Appends an index element to this violation's path.
    pub fn at_index(mut self, index: usize) -> Self {
        self.property_path = self.property_path.with_index(index);
        self
    }

    /// Creates the violation and returns the list builder.
    pub fn add(self) -> ViolationListBuilder {
        self.list.add(
            self.code,
            &self.message_template,
            self.parameters,
            self.property_path,
        )
    }
}
