//! Submission dispatch
//!
//! [`DispatchCoordinator`] reacts to [`FormSubmitted`] events: it reads the
//! form's connector fields, extracts a config per enabled connector and
//! either queues a [`ConnectorTask`] or runs the connector inline. Nothing
//! that happens here can fail the submission flow.

use std::fmt;
use std::sync::Arc;

use formrelay_connector::{
    ConfigurationExtractor, ConnectorConfig, ConnectorRegistry, ProcessOutcome, Submission,
};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::DispatchConfig;
use crate::event::FormSubmitted;
use crate::task::ConnectorTask;
use crate::traits::{BlueprintSource, TaskQueue};

/// What happened to one connector config during dispatch.
#[derive(Debug)]
pub enum DispatchStatus {
    /// Handed to the task queue.
    Queued { task_id: Uuid },
    /// Ran inline.
    Processed(ProcessOutcome),
    /// No connector registered under the config's type.
    UnknownConnector,
    /// The queue refused the task.
    EnqueueFailed { error: String },
    /// The connector panicked while running inline.
    Panicked,
}

impl DispatchStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchStatus::Queued { .. } => "queued",
            DispatchStatus::Processed(_) => "processed",
            DispatchStatus::UnknownConnector => "unknown_connector",
            DispatchStatus::EnqueueFailed { .. } => "enqueue_failed",
            DispatchStatus::Panicked => "panicked",
        }
    }
}

impl fmt::Display for DispatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchStatus::Queued { task_id } => write!(f, "queued ({task_id})"),
            DispatchStatus::Processed(outcome) => write!(f, "processed: {outcome}"),
            DispatchStatus::EnqueueFailed { error } => write!(f, "enqueue failed: {error}"),
            other => f.write_str(other.as_str()),
        }
    }
}

/// One dispatched connector config.
#[derive(Debug)]
pub struct DispatchEntry {
    /// Blueprint field the config came from.
    pub field_handle: String,
    pub connector_type: String,
    pub status: DispatchStatus,
}

/// Per-config record of a dispatch.
#[derive(Debug)]
pub struct DispatchReport {
    pub submission_id: String,
    pub entries: Vec<DispatchEntry>,
}

impl DispatchReport {
    fn new(submission_id: impl Into<String>) -> Self {
        Self {
            submission_id: submission_id.into(),
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tasks handed to the queue.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, DispatchStatus::Queued { .. }))
            .count()
    }

    /// Number of configs processed inline.
    #[must_use]
    pub fn processed(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.status, DispatchStatus::Processed(_)))
            .count()
    }

    /// Entries for a connector type.
    pub fn for_connector<'a>(
        &'a self,
        connector_type: &'a str,
    ) -> impl Iterator<Item = &'a DispatchEntry> + 'a {
        self.entries
            .iter()
            .filter(move |e| e.connector_type == connector_type)
    }
}

/// Routes submissions to connectors, inline or through the task queue.
pub struct DispatchCoordinator {
    registry: Arc<ConnectorRegistry>,
    blueprints: Arc<dyn BlueprintSource>,
    queue: Arc<dyn TaskQueue>,
    config: DispatchConfig,
}

impl DispatchCoordinator {
    pub fn new(
        registry: Arc<ConnectorRegistry>,
        blueprints: Arc<dyn BlueprintSource>,
        queue: Arc<dyn TaskQueue>,
        config: DispatchConfig,
    ) -> Self {
        Self {
            registry,
            blueprints,
            queue,
            config,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectorRegistry> {
        &self.registry
    }

    /// Dispatch a stored submission to every enabled connector.
    pub async fn handle(&self, event: &FormSubmitted) -> DispatchReport {
        let submission = &event.submission;
        let mut report = DispatchReport::new(submission.id.clone());

        for field in self.blueprints.connector_fields(event.form_handle()).await {
            let run_async = field.config.async_processing();

            for config in ConfigurationExtractor::parse(&field.config, &self.registry) {
                let connector_type = config.connector_type.clone();
                let status = if run_async {
                    self.enqueue(submission, config).await
                } else {
                    self.process_inline(submission, config).await
                };

                report.entries.push(DispatchEntry {
                    field_handle: field.handle.clone(),
                    connector_type,
                    status,
                });
            }
        }

        report
    }

    async fn enqueue(&self, submission: &Submission, config: ConnectorConfig) -> DispatchStatus {
        let task = ConnectorTask::new(submission.id.clone(), config).with_retry_policy(&self.config);
        let task_id = task.id;
        let connector_type = task.connector_type.clone();

        match self.queue.enqueue(task).await {
            Ok(()) => {
                info!(
                    target: "formrelay_dispatch",
                    task_id = %task_id,
                    connector = %connector_type,
                    form = %submission.form_handle,
                    submission_id = %submission.id,
                    "Connector task queued"
                );
                DispatchStatus::Queued { task_id }
            }
            Err(e) => {
                error!(
                    target: "formrelay_dispatch",
                    connector = %connector_type,
                    form = %submission.form_handle,
                    submission_id = %submission.id,
                    error = %e,
                    "Failed to queue connector task"
                );
                DispatchStatus::EnqueueFailed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn process_inline(
        &self,
        submission: &Submission,
        config: ConnectorConfig,
    ) -> DispatchStatus {
        let Some(connector) = self.registry.get(&config.connector_type) else {
            warn!(
                target: "formrelay_dispatch",
                connector = %config.connector_type,
                form = %submission.form_handle,
                submission_id = %submission.id,
                "Connector not found"
            );
            return DispatchStatus::UnknownConnector;
        };

        let connector_type = config.connector_type.clone();
        let owned = submission.clone();
        let handle =
            tokio::spawn(async move { connector.process(&owned, &config).await });

        match handle.await {
            Ok(outcome) => {
                info!(
                    target: "formrelay_dispatch",
                    connector = %connector_type,
                    form = %submission.form_handle,
                    submission_id = %submission.id,
                    outcome = %outcome,
                    "Connector processed"
                );
                DispatchStatus::Processed(outcome)
            }
            Err(e) => {
                error!(
                    target: "formrelay_dispatch",
                    connector = %connector_type,
                    form = %submission.form_handle,
                    submission_id = %submission.id,
                    panicked = e.is_panic(),
                    error = %e,
                    "Connector aborted while processing"
                );
                DispatchStatus::Panicked
            }
        }
    }
}
