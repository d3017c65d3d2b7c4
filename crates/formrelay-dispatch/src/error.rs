//! Error types for the formrelay-dispatch crate.

use thiserror::Error;

/// Errors that can occur while queueing connector tasks.
///
/// Dispatch never propagates these to the submission flow; they are logged
/// and recorded in the [`DispatchReport`](crate::DispatchReport).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The queue has no room for another task.
    #[error("Task queue is full")]
    QueueFull,

    /// The queue no longer accepts tasks.
    #[error("Task queue is closed")]
    QueueClosed,

    /// Failed to serialize or deserialize a task.
    #[error("Task serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Queue backend error.
    #[error("Queue error: {message}")]
    Queue { message: String },
}

impl DispatchError {
    /// Returns true if enqueueing may succeed later.
    pub fn is_transient(&self) -> bool {
        matches!(self, DispatchError::QueueFull | DispatchError::Queue { .. })
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration value is invalid.
    #[error("Configuration invalid for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(var: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            var: var.to_string(),
            reason: reason.into(),
        }
    }
}
