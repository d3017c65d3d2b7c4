//! Submission events consumed by the dispatcher.

use chrono::{DateTime, Utc};
use formrelay_connector::Submission;
use serde::{Deserialize, Serialize};

/// Raised by the host once a form submission has been stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSubmitted {
    pub submission: Submission,
    pub occurred_at: DateTime<Utc>,
}

impl FormSubmitted {
    pub fn new(submission: Submission) -> Self {
        Self {
            submission,
            occurred_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn form_handle(&self) -> &str {
        &self.submission.form_handle
    }

    #[must_use]
    pub fn submission_id(&self) -> &str {
        &self.submission.id
    }
}
