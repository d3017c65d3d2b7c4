//! Raw blueprint configuration as authored in the host's form builder.
//!
//! Keys are flattened: `{connector}_{field}`, `{connector}_enabled`, and the
//! global `async_processing` flag.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::is_truthy;

/// Key of the global asynchronous processing toggle.
pub const ASYNC_PROCESSING_KEY: &str = "async_processing";

/// Key of the enable toggle for a connector.
#[must_use]
pub fn enabled_key(connector: &str) -> String {
    format!("{connector}_enabled")
}

/// Key of a connector field.
#[must_use]
pub fn field_key(connector: &str, field: &str) -> String {
    format!("{connector}_{field}")
}

/// Flat key/value configuration of one connector-bearing blueprint field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlueprintConfig(Map<String, Value>);

impl BlueprintConfig {
    /// Create an empty configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Raw value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Whether `key` holds a truthy value.
    #[must_use]
    pub fn is_truthy(&self, key: &str) -> bool {
        self.0.get(key).is_some_and(is_truthy)
    }

    /// Boolean flag with a default for absent keys.
    #[must_use]
    pub fn flag(&self, key: &str, default: bool) -> bool {
        self.0.get(key).map_or(default, is_truthy)
    }

    /// Whether the connector's enable toggle is on.
    #[must_use]
    pub fn is_connector_enabled(&self, connector: &str) -> bool {
        self.is_truthy(&enabled_key(connector))
    }

    /// Whether connectors should run through the task queue. Defaults to true.
    #[must_use]
    pub fn async_processing(&self) -> bool {
        self.flag(ASYNC_PROCESSING_KEY, true)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the configuration has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for BlueprintConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for BlueprintConfig {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys() {
        assert_eq!(enabled_key("webhook"), "webhook_enabled");
        assert_eq!(field_key("webhook", "url"), "webhook_url");
        assert_eq!(field_key("webhook", "auth_header"), "webhook_auth_header");
    }

    #[test]
    fn test_async_processing_defaults_to_true() {
        assert!(BlueprintConfig::new().async_processing());
        assert!(BlueprintConfig::new()
            .with(ASYNC_PROCESSING_KEY, true)
            .async_processing());
        assert!(!BlueprintConfig::new()
            .with(ASYNC_PROCESSING_KEY, false)
            .async_processing());
        assert!(!BlueprintConfig::new()
            .with(ASYNC_PROCESSING_KEY, Value::Null)
            .async_processing());
    }

    #[test]
    fn test_connector_enabled() {
        let config = BlueprintConfig::new()
            .with("webhook_enabled", true)
            .with("slack_enabled", "0");

        assert!(config.is_connector_enabled("webhook"));
        assert!(!config.is_connector_enabled("slack"));
        assert!(!config.is_connector_enabled("email"));
    }

    #[test]
    fn test_deserialize_from_json_object() {
        let config: BlueprintConfig = serde_json::from_value(json!({
            "webhook_enabled": true,
            "webhook_url": "https://example.com"
        }))
        .unwrap();

        assert_eq!(config.len(), 2);
        assert_eq!(config.get("webhook_url"), Some(&json!("https://example.com")));
    }
}
