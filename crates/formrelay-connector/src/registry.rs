//! Connector registry
//!
//! Built once at startup, then shared read-only behind an `Arc`.

use std::fmt;

use crate::fieldset::{self, ConfigSection, Fieldset};
use crate::traits::BoxedConnector;

/// Named connector implementations, in registration order.
#[derive(Default, Clone)]
pub struct ConnectorRegistry {
    connectors: Vec<BoxedConnector>,
}

impl ConnectorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connector under its descriptor handle.
    ///
    /// Registering a handle twice replaces the earlier connector; the handle
    /// keeps its original position in iteration order.
    pub fn register(&mut self, connector: BoxedConnector) {
        let handle = connector.handle().to_string();
        match self.connectors.iter_mut().find(|c| c.handle() == handle) {
            Some(slot) => {
                tracing::debug!(
                    target: "formrelay_registry",
                    connector = %handle,
                    "Replacing previously registered connector"
                );
                *slot = connector;
            }
            None => {
                tracing::debug!(
                    target: "formrelay_registry",
                    connector = %handle,
                    "Registered connector"
                );
                self.connectors.push(connector);
            }
        }
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, connector: BoxedConnector) -> Self {
        self.register(connector);
        self
    }

    /// Look up a connector by handle. `None` means "unknown connector".
    #[must_use]
    pub fn get(&self, handle: &str) -> Option<BoxedConnector> {
        self.connectors
            .iter()
            .find(|c| c.handle() == handle)
            .cloned()
    }

    /// Whether a connector is registered under `handle`.
    #[must_use]
    pub fn contains(&self, handle: &str) -> bool {
        self.connectors.iter().any(|c| c.handle() == handle)
    }

    /// All connectors as `(handle, connector)`, in registration order.
    pub fn all(&self) -> impl Iterator<Item = (&str, &BoxedConnector)> {
        self.connectors.iter().map(|c| (c.handle(), c))
    }

    /// Registered handles, in registration order.
    #[must_use]
    pub fn handles(&self) -> Vec<&str> {
        self.connectors.iter().map(|c| c.handle()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }

    /// Display name and field specs of every connector.
    #[must_use]
    pub fn fieldsets(&self) -> Vec<Fieldset> {
        self.connectors
            .iter()
            .map(|c| Fieldset::from_descriptor(c.descriptor()))
            .collect()
    }

    /// Blueprint configuration sections the host renders for a
    /// connector-bearing form field.
    #[must_use]
    pub fn config_fields(&self) -> Vec<ConfigSection> {
        fieldset::config_sections(self.connectors.iter().map(|c| c.descriptor()))
    }
}

impl fmt::Debug for ConnectorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectorRegistry")
            .field("connectors", &self.handles())
            .finish()
    }
}
