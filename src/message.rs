//! Message templates and placeholder rendering.
//!
//! Violation messages are stored as templates such as
//! `"This value should have {{ limit }} characters or more."` together with
//! the parameters that fill the placeholders.

/// A placeholder key and the value rendered in its place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TemplateParameter {
    /// The placeholder as it appears in the template, e.g. `{{ value }}`.
    pub key: String,
    /// The text substituted for the placeholder.
    pub value: String,
}

impl TemplateParameter {
    /// Creates a new template parameter.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Renders a template by substituting every parameter key with its value.
///
/// Longer keys are substituted first so that a key which is a prefix of
/// another key cannot clobber it.
///
/// # Example
///
/// ```rust
/// use inquest::message::{render_message, TemplateParameter};
///
/// let message = render_message(
///     "It should have {{ limit }} characters or more.",
///     &[TemplateParameter::new("{{ limit }}", "3")],
/// );
/// assert_eq!(message, "It should have 3 characters or more.");
/// ```
pub fn render_message(template: &str, parameters: &[TemplateParameter]) -> String {
    let mut ordered: Vec<&TemplateParameter> = parameters.iter().collect();
    ordered.sort_by(|a, b| b.key.len().cmp(&a.key.len()));

    ordered
        .into_iter()
        .fold(template.to_string(), |message, parameter| {
            message.replace(&parameter.key, &parameter.value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_without_parameters() {
        assert_eq!(render_message("plain", &[]), "plain");
    }

    #[test]
    fn test_render_replaces_every_occurrence() {
        let message = render_message(
            "{{ value }} is not {{ value }}",
            &[TemplateParameter::new("{{ value }}", "x")],
        );
        assert_eq!(message, "x is not x");
    }

    #[test]
    fn test_longer_keys_win() {
        let message = render_message(
            "{{ limit }} / {{ limitMax }}",
            &[
                TemplateParameter::new("{{ limit", "A"),
                TemplateParameter::new("{{ limitMax }}", "B"),
            ],
        );
        assert_eq!(message, "A }} / B");
    }
}
