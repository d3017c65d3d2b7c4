//! Blueprint configuration fields generated from connector descriptors.
//!
//! The host's form builder renders these sections for a connector-bearing
//! field; the values authors enter come back as a [`BlueprintConfig`].
//!
//! [`BlueprintConfig`]: crate::blueprint::BlueprintConfig

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::blueprint::{enabled_key, field_key, ASYNC_PROCESSING_KEY};
use crate::schema::{ConnectorDescriptor, FieldSpec};

/// Display name and field specs of one connector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fieldset {
    pub handle: String,
    pub display: String,
    pub fields: Vec<FieldSpec>,
}

impl Fieldset {
    #[must_use]
    pub fn from_descriptor(descriptor: &ConnectorDescriptor) -> Self {
        Self {
            handle: descriptor.handle.clone(),
            display: descriptor.display_name.clone(),
            fields: descriptor.field_specs.clone(),
        }
    }
}

/// A blueprint config field, keyed by its flattened key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigField {
    /// Flattened key, e.g. `webhook_url`.
    pub key: String,
    pub spec: FieldSpec,
    /// Toggle key that must be on for this field to be shown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shown_when: Option<String>,
}

/// A titled group of config fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSection {
    pub display: String,
    pub fields: Vec<ConfigField>,
}

impl ConfigSection {
    /// Field with the given flattened key.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|f| f.key == key)
    }
}

/// Build the processing settings section followed by one section per connector.
pub fn config_sections<'a, I>(descriptors: I) -> Vec<ConfigSection>
where
    I: IntoIterator<Item = &'a ConnectorDescriptor>,
{
    let mut sections = vec![processing_section()];
    sections.extend(descriptors.into_iter().map(connector_section));
    sections
}

fn processing_section() -> ConfigSection {
    let spec = FieldSpec::toggle(ASYNC_PROCESSING_KEY, "Asynchronous Processing")
        .instructions("Process connectors in background jobs (recommended for production)")
        .default_value(true)
        .width(100);

    ConfigSection {
        display: "Processing Settings".to_string(),
        fields: vec![ConfigField {
            key: ASYNC_PROCESSING_KEY.to_string(),
            spec,
            shown_when: None,
        }],
    }
}

fn connector_section(descriptor: &ConnectorDescriptor) -> ConfigSection {
    let toggle_key = enabled_key(&descriptor.handle);
    let toggle = FieldSpec::toggle(
        toggle_key.clone(),
        format!("Enable {}", descriptor.display_name),
    )
    .default_value(Value::Bool(false))
    .width(100);

    let mut fields = vec![ConfigField {
        key: toggle_key.clone(),
        spec: toggle,
        shown_when: None,
    }];

    for spec in &descriptor.field_specs {
        let key = field_key(&descriptor.handle, &spec.handle);
        let mut spec = spec.clone();
        spec.handle = key.clone();
        spec.validate = spec
            .validate
            .as_deref()
            .map(|rule| conditional_rule(rule, &toggle_key));

        fields.push(ConfigField {
            key,
            spec,
            shown_when: Some(toggle_key.clone()),
        });
    }

    ConfigSection {
        display: descriptor.display_name.clone(),
        fields,
    }
}

/// Make a bare `required` rule apply only while the connector is enabled.
fn conditional_rule(rule: &str, toggle_key: &str) -> String {
    rule.split('|')
        .map(|part| {
            if part == "required" {
                format!("required_if:{toggle_key},true")
            } else {
                part.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("|")
}
