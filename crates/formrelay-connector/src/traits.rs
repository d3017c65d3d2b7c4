//! Connector trait
//!
//! Every destination (webhook, and whatever comes next) implements
//! [`Connector`] and is registered under its descriptor handle.

use std::sync::Arc;

use async_trait::async_trait;

use crate::outcome::ProcessOutcome;
use crate::schema::ConnectorDescriptor;
use crate::types::{ConnectorConfig, Submission};

/// A pluggable destination that receives form submissions.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Static description: handle, name and configurable fields.
    fn descriptor(&self) -> &ConnectorDescriptor;

    /// Unique handle of this connector.
    fn handle(&self) -> &str {
        &self.descriptor().handle
    }

    /// Display name for this connector.
    fn display_name(&self) -> &str {
        &self.descriptor().display_name
    }

    /// Forward one submission using an extracted configuration.
    ///
    /// Implementations must not panic and must log their own failures; the
    /// returned outcome decides whether a queued task retries.
    async fn process(&self, submission: &Submission, config: &ConnectorConfig) -> ProcessOutcome;
}

/// Shared connector handle as stored in the registry.
pub type BoxedConnector = Arc<dyn Connector>;
