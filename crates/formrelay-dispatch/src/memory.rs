//! In-memory collaborators for embedding and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use formrelay_connector::{BlueprintConfig, Submission};
use tokio::sync::RwLock;

use crate::traits::{BlueprintSource, ConnectorField, SubmissionStore};

/// Submission store backed by a map.
#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    submissions: RwLock<HashMap<String, Submission>>,
}

impl InMemorySubmissionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a submission, replacing any with the same id.
    pub async fn insert(&self, submission: Submission) {
        self.submissions
            .write()
            .await
            .insert(submission.id.clone(), submission);
    }

    /// Delete a submission. Pending tasks for it are abandoned when they run.
    pub async fn remove(&self, id: &str) -> Option<Submission> {
        self.submissions.write().await.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.submissions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.submissions.read().await.is_empty()
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn find_submission_by_id(&self, id: &str) -> Option<Submission> {
        self.submissions.read().await.get(id).cloned()
    }
}

/// Blueprint connector fields keyed by form handle.
#[derive(Debug, Default)]
pub struct InMemoryBlueprints {
    forms: RwLock<HashMap<String, Vec<ConnectorField>>>,
}

impl InMemoryBlueprints {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a connector field to a form's blueprint.
    pub async fn add_field(
        &self,
        form_handle: impl Into<String>,
        field_handle: impl Into<String>,
        config: BlueprintConfig,
    ) {
        self.forms
            .write()
            .await
            .entry(form_handle.into())
            .or_default()
            .push(ConnectorField::new(field_handle, config));
    }

    /// Replace all connector fields of a form.
    pub async fn set_fields(&self, form_handle: impl Into<String>, fields: Vec<ConnectorField>) {
        self.forms.write().await.insert(form_handle.into(), fields);
    }
}

#[async_trait]
impl BlueprintSource for InMemoryBlueprints {
    async fn connector_fields(&self, form_handle: &str) -> Vec<ConnectorField> {
        self.forms
            .read()
            .await
            .get(form_handle)
            .cloned()
            .unwrap_or_default()
    }
}
