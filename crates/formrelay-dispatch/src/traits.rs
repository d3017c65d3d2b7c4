//! Collaborator traits
//!
//! Dispatch reads submissions and blueprint configuration from the host
//! application and hands async work to a queue. Each collaborator is a
//! trait so hosts can plug in their own storage or broker.

use async_trait::async_trait;
use formrelay_connector::{BlueprintConfig, Submission};
use serde::{Deserialize, Serialize};

use crate::error::DispatchError;
use crate::task::ConnectorTask;

/// A blueprint field carrying connector configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorField {
    /// Handle of the blueprint field.
    pub handle: String,
    /// Raw configuration stored on the field.
    pub config: BlueprintConfig,
}

impl ConnectorField {
    pub fn new(handle: impl Into<String>, config: BlueprintConfig) -> Self {
        Self {
            handle: handle.into(),
            config,
        }
    }
}

/// Looks up stored submissions.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// `None` when the submission no longer exists.
    async fn find_submission_by_id(&self, id: &str) -> Option<Submission>;
}

/// Reads connector configuration from form blueprints.
#[async_trait]
pub trait BlueprintSource: Send + Sync {
    /// Connector-bearing fields of a form's blueprint, in blueprint order.
    async fn connector_fields(&self, form_handle: &str) -> Vec<ConnectorField>;
}

/// Accepts connector tasks for asynchronous execution.
#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn enqueue(&self, task: ConnectorTask) -> Result<(), DispatchError>;

    /// Put a task back for its next attempt.
    ///
    /// Unlike `enqueue`, implementations may wait for capacity. An error
    /// means the task can no longer be run.
    async fn requeue(&self, task: ConnectorTask) -> Result<(), DispatchError> {
        self.enqueue(task).await
    }
}
