//! Connector error types
//!
//! Error definitions with transient/permanent classification for retry logic.

use thiserror::Error;

/// Error that can occur while a connector handles a submission.
#[derive(Debug, Error)]
pub enum ConnectorError {
    // Validation errors (permanent)
    /// Destination URL is malformed or uses an unsupported scheme.
    #[error("invalid URL: {message}")]
    InvalidUrl { message: String },

    /// HTTP method could not be parsed.
    #[error("invalid HTTP method: {method}")]
    InvalidMethod { method: String },

    // Transport errors (transient)
    /// Request did not complete within the timeout.
    #[error("request timeout after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// Could not connect to the destination.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Any other failure while sending the request.
    #[error("request error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Destination answered with a non-success status.
    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    // Internal errors (permanent)
    /// Payload could not be serialized.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// Internal error.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ConnectorError {
    /// Check if this error is transient and the delivery should be retried.
    ///
    /// Every transport-level failure counts, including non-2xx answers.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ConnectorError::Timeout { .. }
                | ConnectorError::ConnectionFailed { .. }
                | ConnectorError::Transport { .. }
                | ConnectorError::HttpStatus { .. }
        )
    }

    /// Check if this error is permanent and retry won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    /// Get an error code for classification.
    pub fn error_code(&self) -> &'static str {
        match self {
            ConnectorError::InvalidUrl { .. } => "INVALID_URL",
            ConnectorError::InvalidMethod { .. } => "INVALID_METHOD",
            ConnectorError::Timeout { .. } => "TIMEOUT",
            ConnectorError::ConnectionFailed { .. } => "CONNECTION_FAILED",
            ConnectorError::Transport { .. } => "TRANSPORT_ERROR",
            ConnectorError::HttpStatus { .. } => "HTTP_STATUS",
            ConnectorError::Serialization { .. } => "SERIALIZATION_ERROR",
            ConnectorError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    // Convenience constructors

    /// Create an invalid URL error.
    pub fn invalid_url(message: impl Into<String>) -> Self {
        ConnectorError::InvalidUrl {
            message: message.into(),
        }
    }

    /// Create a connection failed error with source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        ConnectorError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error with source.
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ConnectorError::Internal {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(e: serde_json::Error) -> Self {
        ConnectorError::Serialization {
            message: e.to_string(),
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
