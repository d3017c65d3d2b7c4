//! Retryable connector tasks
//!
//! A [`ConnectorTask`] runs one connector for one submission. It carries
//! only the submission id, so a submission deleted before the task runs
//! cancels it. Tasks serialize to JSON and can cross a process boundary.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use formrelay_connector::{ConnectorConfig, ConnectorRegistry, ProcessOutcome};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::{DispatchConfig, DEFAULT_BACKOFF_SECS, DEFAULT_MAX_ATTEMPTS};
use crate::error::DispatchError;
use crate::traits::SubmissionStore;

/// Shared dependencies for task execution.
#[derive(Clone)]
pub struct TaskContext {
    pub submissions: Arc<dyn SubmissionStore>,
    pub registry: Arc<ConnectorRegistry>,
}

impl TaskContext {
    pub fn new(submissions: Arc<dyn SubmissionStore>, registry: Arc<ConnectorRegistry>) -> Self {
        Self {
            submissions,
            registry,
        }
    }
}

/// Result of one task execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The connector delivered or deliberately skipped.
    Succeeded,
    /// Run the task again after `after`.
    Retry { after: Duration },
    /// No attempts left, or the failure is permanent.
    Failed,
    /// The submission or connector is gone; nothing to retry.
    Abandoned,
}

impl TaskOutcome {
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskOutcome::Retry { .. })
    }
}

/// One connector invocation for one submission, retried on transient failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorTask {
    pub id: Uuid,
    pub submission_id: String,
    pub connector_type: String,
    pub config: ConnectorConfig,
    /// Attempts started so far.
    pub attempt: u32,
    pub max_attempts: u32,
    pub backoff_secs: u64,
    pub created_at: DateTime<Utc>,
}

impl ConnectorTask {
    /// Create a task with the default retry policy (3 attempts, 60s apart).
    pub fn new(submission_id: impl Into<String>, config: ConnectorConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            submission_id: submission_id.into(),
            connector_type: config.connector_type.clone(),
            config,
            attempt: 0,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff_secs: DEFAULT_BACKOFF_SECS,
            created_at: Utc::now(),
        }
    }

    /// Apply the retry policy of a dispatch configuration.
    #[must_use]
    pub fn with_retry_policy(mut self, config: &DispatchConfig) -> Self {
        self.max_attempts = config.max_attempts;
        self.backoff_secs = config.backoff_secs;
        self
    }

    #[must_use]
    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }

    /// Whether every attempt has been used.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }

    pub fn to_json(&self) -> Result<String, DispatchError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, DispatchError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Run one attempt.
    ///
    /// The attempt counter is advanced before anything else, so a task that
    /// is abandoned or fails still counts the attempt.
    pub async fn execute(&mut self, ctx: &TaskContext) -> TaskOutcome {
        if self.is_exhausted() {
            return TaskOutcome::Failed;
        }
        self.attempt += 1;

        let Some(submission) = ctx.submissions.find_submission_by_id(&self.submission_id).await
        else {
            warn!(
                target: "formrelay_task",
                task_id = %self.id,
                submission_id = %self.submission_id,
                connector = %self.connector_type,
                "Submission not found for connector task"
            );
            return TaskOutcome::Abandoned;
        };

        let Some(connector) = ctx.registry.get(&self.connector_type) else {
            warn!(
                target: "formrelay_task",
                task_id = %self.id,
                submission_id = %self.submission_id,
                connector = %self.connector_type,
                "Connector not found"
            );
            return TaskOutcome::Abandoned;
        };

        match connector.process(&submission, &self.config).await {
            outcome @ (ProcessOutcome::Delivered { .. } | ProcessOutcome::Skipped(_)) => {
                info!(
                    target: "formrelay_task",
                    task_id = %self.id,
                    submission_id = %self.submission_id,
                    connector = %self.connector_type,
                    attempt = self.attempt,
                    outcome = %outcome,
                    "Connector processed successfully"
                );
                TaskOutcome::Succeeded
            }
            ProcessOutcome::Failed(e) => {
                error!(
                    target: "formrelay_task",
                    task_id = %self.id,
                    submission_id = %self.submission_id,
                    connector = %self.connector_type,
                    attempt = self.attempt,
                    max_attempts = self.max_attempts,
                    error = %e,
                    "Connector processing failed"
                );

                if e.is_transient() && !self.is_exhausted() {
                    return TaskOutcome::Retry {
                        after: self.backoff(),
                    };
                }

                error!(
                    target: "formrelay_task",
                    task_id = %self.id,
                    submission_id = %self.submission_id,
                    connector = %self.connector_type,
                    attempts = self.attempt,
                    error = %e,
                    "Connector job failed permanently"
                );
                TaskOutcome::Failed
            }
        }
    }
}
