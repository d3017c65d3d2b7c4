//! Connector descriptors and the field specs they expose to the form builder.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of input the host renders for a field spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    /// Single-line text input.
    Text,
    /// Multi-line text input.
    Textarea,
    /// Boolean switch.
    Toggle,
    /// Choice from a fixed list of options.
    Select { options: Vec<String> },
    /// Repeatable rows, each made of the nested fields.
    Grid { fields: Vec<FieldSpec> },
}

/// One configurable input a connector accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Handle of the field, unique within the connector.
    pub handle: String,
    #[serde(flatten)]
    pub field_type: FieldType,
    /// Label shown to authors.
    pub display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Host validation rule, e.g. `required` or `required|url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u8>,
}

impl FieldSpec {
    /// Create a field spec of the given type.
    pub fn new(handle: impl Into<String>, field_type: FieldType, display: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            field_type,
            display: display.into(),
            instructions: None,
            default: None,
            validate: None,
            width: None,
        }
    }

    /// Single-line text field.
    pub fn text(handle: impl Into<String>, display: impl Into<String>) -> Self {
        Self::new(handle, FieldType::Text, display)
    }

    /// Multi-line text field.
    pub fn textarea(handle: impl Into<String>, display: impl Into<String>) -> Self {
        Self::new(handle, FieldType::Textarea, display)
    }

    /// Boolean toggle.
    pub fn toggle(handle: impl Into<String>, display: impl Into<String>) -> Self {
        Self::new(handle, FieldType::Toggle, display)
    }

    /// Select field with the given options.
    pub fn select<I, S>(handle: impl Into<String>, display: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let options = options.into_iter().map(Into::into).collect();
        Self::new(handle, FieldType::Select { options }, display)
    }

    /// Grid field with the given columns.
    pub fn grid(
        handle: impl Into<String>,
        display: impl Into<String>,
        fields: Vec<FieldSpec>,
    ) -> Self {
        Self::new(handle, FieldType::Grid { fields }, display)
    }

    #[must_use]
    pub fn instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    #[must_use]
    pub fn validate(mut self, rule: impl Into<String>) -> Self {
        self.validate = Some(rule.into());
        self
    }

    #[must_use]
    pub fn width(mut self, width: u8) -> Self {
        self.width = Some(width);
        self
    }

    /// Whether the validation rule mentions `required` anywhere.
    ///
    /// Conditional rules such as `required_if:...` count as required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.validate
            .as_deref()
            .is_some_and(|rule| rule.contains("required"))
    }
}

/// Static description of a connector implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorDescriptor {
    /// Unique handle, used as the `type` of extracted configurations.
    pub handle: String,
    /// Human readable name.
    pub display_name: String,
    /// Configurable fields, in display order.
    pub field_specs: Vec<FieldSpec>,
}

impl ConnectorDescriptor {
    pub fn new(handle: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            display_name: display_name.into(),
            field_specs: Vec::new(),
        }
    }

    /// Append a field spec.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.field_specs.push(spec);
        self
    }

    /// Field specs marked as required.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.field_specs.iter().filter(|f| f.is_required())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_required() {
        assert!(FieldSpec::text("url", "URL").validate("required").is_required());
        assert!(FieldSpec::text("url", "URL")
            .validate("required_if:webhook_enabled,true|sometimes")
            .is_required());
        assert!(!FieldSpec::text("url", "URL").validate("url").is_required());
        assert!(!FieldSpec::text("url", "URL").is_required());
    }

    #[test]
    fn test_required_fields() {
        let descriptor = ConnectorDescriptor::new("webhook", "Webhook")
            .field(FieldSpec::text("url", "URL").validate("required"))
            .field(FieldSpec::text("auth_header", "Authorization Header"));

        let required: Vec<_> = descriptor.required_fields().map(|f| f.handle.as_str()).collect();
        assert_eq!(required, vec!["url"]);
    }

    #[test]
    fn test_field_spec_serialization() {
        let spec = FieldSpec::select("method", "HTTP Method", ["POST", "PUT"]).default_value("POST");
        let value = serde_json::to_value(&spec).unwrap();

        assert_eq!(
            value,
            json!({
                "handle": "method",
                "type": "select",
                "options": ["POST", "PUT"],
                "display": "HTTP Method",
                "default": "POST"
            })
        );
    }
}
