//! Configuration extraction
//!
//! Turns the flat blueprint configuration of a connector-bearing field into
//! one validated [`ConnectorConfig`] per enabled connector.

use crate::blueprint::{field_key, BlueprintConfig};
use crate::registry::ConnectorRegistry;
use crate::schema::ConnectorDescriptor;
use crate::types::ConnectorConfig;

/// Extracts connector configurations from blueprint configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigurationExtractor;

impl ConfigurationExtractor {
    /// Extract the configurations of every enabled, valid connector.
    ///
    /// Output follows registry order. A connector with a missing or empty
    /// required field is dropped entirely.
    #[must_use]
    pub fn parse(blueprint: &BlueprintConfig, registry: &ConnectorRegistry) -> Vec<ConnectorConfig> {
        registry
            .all()
            .filter_map(|(_, connector)| Self::extract(blueprint, connector.descriptor()))
            .collect()
    }

    /// Extract the configuration of a single connector.
    #[must_use]
    pub fn extract(
        blueprint: &BlueprintConfig,
        descriptor: &ConnectorDescriptor,
    ) -> Option<ConnectorConfig> {
        let handle = descriptor.handle.as_str();
        if !blueprint.is_connector_enabled(handle) {
            return None;
        }

        let mut config = ConnectorConfig::new(handle);
        for spec in &descriptor.field_specs {
            if let Some(value) = blueprint.get(&field_key(handle, &spec.handle)) {
                config.insert(spec.handle.clone(), value.clone());
            }
        }

        if let Some(missing) = descriptor
            .required_fields()
            .find(|spec| !config.has_value(&spec.handle))
        {
            tracing::debug!(
                target: "formrelay_config",
                connector = %handle,
                field = %missing.handle,
                "Dropping connector config with missing required field"
            );
            return None;
        }

        Some(config)
    }
}
