//! Webhook payload construction.

use formrelay_connector::Submission;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Maps one form field onto a key of the outgoing payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    #[serde(default)]
    pub form_field: String,
    #[serde(default)]
    pub webhook_key: String,
}

impl FieldMapping {
    pub fn new(form_field: impl Into<String>, webhook_key: impl Into<String>) -> Self {
        Self {
            form_field: form_field.into(),
            webhook_key: webhook_key.into(),
        }
    }

    /// Both sides are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.form_field.is_empty() && !self.webhook_key.is_empty()
    }
}

/// Read the `field_mapping` grid rows.
///
/// Rows that are not objects, or lack either side, are kept as incomplete
/// mappings: they still switch the payload into mapped mode but map nothing.
#[must_use]
pub fn parse_field_mappings(value: Option<&Value>) -> Vec<FieldMapping> {
    let Some(Value::Array(rows)) = value else {
        return Vec::new();
    };

    rows.iter()
        .map(|row| FieldMapping {
            form_field: string_at(row, "form_field"),
            webhook_key: string_at(row, "webhook_key"),
        })
        .collect()
}

fn string_at(row: &Value, key: &str) -> String {
    row.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Build the JSON payload for a submission.
///
/// Always carries `form`, `id` and `date`. With mappings, each complete
/// mapping whose form field exists adds `webhook_key: value`; without
/// mappings the whole submission data is attached under `data`.
#[must_use]
pub fn build_payload(submission: &Submission, mappings: &[FieldMapping]) -> Map<String, Value> {
    let mut payload = Map::new();
    payload.insert("form".into(), Value::String(submission.form_handle.clone()));
    payload.insert("id".into(), Value::String(submission.id.clone()));
    payload.insert("date".into(), Value::String(submission.iso_date()));

    if mappings.is_empty() {
        payload.insert("data".into(), Value::Object(submission.data.clone()));
        return payload;
    }

    for mapping in mappings.iter().filter(|m| m.is_complete()) {
        if let Some(value) = submission.get(&mapping.form_field) {
            payload.insert(mapping.webhook_key.clone(), value.clone());
        }
    }

    payload
}
