//! # Connector Framework
//!
//! Core abstractions for forwarding form submissions to external
//! destinations.
//!
//! ## Architecture
//!
//! - [`Connector`] - Trait every destination implements
//! - [`ConnectorRegistry`] - Connectors keyed by handle, in registration order
//! - [`ConfigurationExtractor`] - Blueprint configuration to per-connector configs
//! - [`ProcessOutcome`] - Explicit result of one connector invocation
//!
//! ## Example
//!
//! ```ignore
//! use formrelay_connector::prelude::*;
//!
//! let registry = ConnectorRegistry::new().with(Arc::new(WebhookConnector::new()?));
//!
//! let blueprint = BlueprintConfig::new()
//!     .with("webhook_enabled", true)
//!     .with("webhook_url", "https://hooks.example.com/forms");
//!
//! for config in ConfigurationExtractor::parse(&blueprint, &registry) {
//!     let connector = registry.get(&config.connector_type).unwrap();
//!     let outcome = connector.process(&submission, &config).await;
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`types`] - Submissions and extracted connector configs
//! - [`blueprint`] - Raw blueprint configuration and key conventions
//! - [`schema`] - Connector descriptors and field specs
//! - [`fieldset`] - Blueprint config fields generated from descriptors
//! - [`error`] - Error types with transient/permanent classification
//! - [`outcome`] - Connector invocation outcomes
//! - [`traits`] - The connector trait
//! - [`registry`] - Connector registry
//! - [`extractor`] - Configuration extraction

pub mod blueprint;
pub mod error;
pub mod extractor;
pub mod fieldset;
pub mod outcome;
pub mod registry;
pub mod schema;
pub mod traits;
pub mod types;

pub use blueprint::BlueprintConfig;
pub use error::{ConnectorError, ConnectorResult};
pub use extractor::ConfigurationExtractor;
pub use outcome::{ProcessOutcome, SkipReason};
pub use registry::ConnectorRegistry;
pub use schema::{ConnectorDescriptor, FieldSpec, FieldType};
pub use traits::{BoxedConnector, Connector};
pub use types::{is_truthy, ConnectorConfig, Submission};

/// Prelude module for convenient imports.
///
/// ```
/// use formrelay_connector::prelude::*;
/// ```
pub mod prelude {
    pub use crate::blueprint::{BlueprintConfig, ASYNC_PROCESSING_KEY};
    pub use crate::error::{ConnectorError, ConnectorResult};
    pub use crate::extractor::ConfigurationExtractor;
    pub use crate::fieldset::{ConfigField, ConfigSection, Fieldset};
    pub use crate::outcome::{ProcessOutcome, SkipReason};
    pub use crate::registry::ConnectorRegistry;
    pub use crate::schema::{ConnectorDescriptor, FieldSpec, FieldType};
    pub use crate::traits::{BoxedConnector, Connector};
    pub use crate::types::{ConnectorConfig, Submission};
}

// Re-export async_trait for connector implementors
pub use async_trait::async_trait;
