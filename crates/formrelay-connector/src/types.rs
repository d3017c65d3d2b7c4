//! Core data types
//!
//! Submissions as seen by connectors, and the per-connector configuration
//! produced from a form blueprint.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Loose truthiness of a blueprint value.
///
/// `null`, `false`, zero, `""`, `"0"` and empty arrays/objects are falsy.
/// The same rule decides whether a required value counts as "non-empty".
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// A completed form submission, owned by the host platform.
///
/// Connectors only ever read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    /// Opaque submission identifier.
    pub id: String,
    /// Handle of the form this submission belongs to.
    pub form_handle: String,
    /// Submitted field values keyed by form field handle.
    pub data: Map<String, Value>,
    /// When the submission was created.
    pub date: DateTime<Utc>,
}

impl Submission {
    /// Create an empty submission dated now.
    pub fn new(id: impl Into<String>, form_handle: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            form_handle: form_handle.into(),
            data: Map::new(),
            date: Utc::now(),
        }
    }

    /// Set a single field value.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(field.into(), value.into());
        self
    }

    /// Replace all field values.
    #[must_use]
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Set the submission date.
    #[must_use]
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Whether the submission carries a value for `field`.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.data.contains_key(field)
    }

    /// Value submitted for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Submission date as ISO-8601 with microsecond precision, e.g.
    /// `2024-05-01T12:30:00.000000Z`.
    #[must_use]
    pub fn iso_date(&self) -> String {
        self.date.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}

/// Validated configuration for a single connector on a single submission.
///
/// Serializes flat: `{"type": "webhook", "enabled": true, "url": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorConfig {
    /// Handle of the connector this configuration targets.
    #[serde(rename = "type")]
    pub connector_type: String,
    /// Always true for extracted configurations.
    pub enabled: bool,
    /// Field values keyed by field spec handle.
    #[serde(flatten)]
    pub values: Map<String, Value>,
}

impl ConnectorConfig {
    /// Create an enabled configuration with no field values.
    pub fn new(connector_type: impl Into<String>) -> Self {
        Self {
            connector_type: connector_type.into(),
            enabled: true,
            values: Map::new(),
        }
    }

    /// Set a field value.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Set a field value in place.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    /// Raw value for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Value for `field` when it is a non-empty string.
    #[must_use]
    pub fn get_str(&self, field: &str) -> Option<&str> {
        match self.values.get(field) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Whether `field` is present and non-empty.
    #[must_use]
    pub fn has_value(&self, field: &str) -> bool {
        self.values.get(field).is_some_and(is_truthy)
    }
}
