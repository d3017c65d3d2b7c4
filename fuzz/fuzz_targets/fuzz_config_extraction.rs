//! Fuzz target for blueprint configuration extraction.
//!
//! Checks that extraction is pure, never yields a disabled connector and
//! never yields a config with an empty required field.
//!
//! Run with:
//! cargo +nightly fuzz run fuzz_config_extraction -- -max_total_time=600

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use formrelay_connector::{BlueprintConfig, ConfigurationExtractor, ConnectorRegistry};
use formrelay_webhooks::WebhookConnector;
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

#[derive(Arbitrary, Debug)]
enum FuzzValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl From<FuzzValue> for Value {
    fn from(value: FuzzValue) -> Self {
        match value {
            FuzzValue::Null => Value::Null,
            FuzzValue::Bool(b) => Value::Bool(b),
            FuzzValue::Int(i) => Value::from(i),
            FuzzValue::Float(f) => Value::from(f),
            FuzzValue::Text(s) => Value::String(s),
            FuzzValue::List(items) => Value::from(items),
        }
    }
}

const KEYS: &[&str] = &[
    "async_processing",
    "webhook_enabled",
    "webhook_url",
    "webhook_method",
    "webhook_secret_key",
    "webhook_allowed_ips",
    "webhook_field_mapping",
];

#[derive(Arbitrary, Debug)]
struct BlueprintInput {
    known: Vec<(u8, FuzzValue)>,
    unknown: Vec<(String, FuzzValue)>,
}

fuzz_target!(|input: BlueprintInput| {
    if input.known.len() + input.unknown.len() > 64 {
        return;
    }

    let mut blueprint = BlueprintConfig::new();
    for (index, value) in input.known {
        let key = KEYS[usize::from(index) % KEYS.len()];
        blueprint = blueprint.with(key, value);
    }
    for (key, value) in input.unknown {
        blueprint = blueprint.with(key, value);
    }

    let Ok(connector) = WebhookConnector::new() else {
        return;
    };
    let registry = ConnectorRegistry::new().with(Arc::new(connector));

    let configs = ConfigurationExtractor::parse(&blueprint, &registry);
    assert_eq!(configs, ConfigurationExtractor::parse(&blueprint, &registry));

    if !blueprint.is_connector_enabled("webhook") {
        assert!(configs.is_empty());
    }
    for config in &configs {
        assert!(config.enabled);
        assert!(config.has_value("url"));
    }
});
