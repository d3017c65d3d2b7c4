//! Result of a single connector invocation.

use std::fmt;

use crate::error::ConnectorError;

/// Why a connector did nothing for a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No destination configured; a silent no-op.
    NotConfigured,
    /// Destination failed format or scheme validation.
    InvalidDestination,
    /// Configured HTTP method is not a valid method token.
    InvalidMethod,
    /// Destination is not on the configured allowlist.
    DestinationNotAllowed,
}

impl SkipReason {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NotConfigured => "not_configured",
            SkipReason::InvalidDestination => "invalid_destination",
            SkipReason::InvalidMethod => "invalid_method",
            SkipReason::DestinationNotAllowed => "destination_not_allowed",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of `Connector::process`.
///
/// Connectors report failures through this value instead of returning an
/// error, so one connector can never abort the submission flow.
#[derive(Debug)]
pub enum ProcessOutcome {
    /// Destination accepted the submission.
    Delivered { status: u16, latency_ms: u64 },
    /// Connector decided not to deliver; retrying will not change that.
    Skipped(SkipReason),
    /// Delivery was attempted and failed.
    Failed(ConnectorError),
}

impl ProcessOutcome {
    /// Short label for logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessOutcome::Delivered { .. } => "delivered",
            ProcessOutcome::Skipped(_) => "skipped",
            ProcessOutcome::Failed(_) => "failed",
        }
    }

    #[must_use]
    pub fn is_delivered(&self) -> bool {
        matches!(self, ProcessOutcome::Delivered { .. })
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, ProcessOutcome::Failed(_))
    }

    /// Whether a queued task should try again after this outcome.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            ProcessOutcome::Failed(e) => e.is_transient(),
            _ => false,
        }
    }

    /// The failure, if any.
    #[must_use]
    pub fn error(&self) -> Option<&ConnectorError> {
        match self {
            ProcessOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ProcessOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessOutcome::Delivered { status, latency_ms } => {
                write!(f, "delivered (HTTP {status}, {latency_ms}ms)")
            }
            ProcessOutcome::Skipped(reason) => write!(f, "skipped ({reason})"),
            ProcessOutcome::Failed(e) => write!(f, "failed ({e})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_only_for_transient_failures() {
        assert!(ProcessOutcome::Failed(ConnectorError::HttpStatus { status: 500 }).is_retryable());
        assert!(ProcessOutcome::Failed(ConnectorError::Timeout { timeout_secs: 10 }).is_retryable());
        assert!(!ProcessOutcome::Failed(ConnectorError::internal("x")).is_retryable());
        assert!(!ProcessOutcome::Skipped(SkipReason::InvalidDestination).is_retryable());
        assert!(!ProcessOutcome::Delivered {
            status: 200,
            latency_ms: 5
        }
        .is_retryable());
    }

    #[test]
    fn test_display() {
        let outcome = ProcessOutcome::Delivered {
            status: 201,
            latency_ms: 12,
        };
        assert_eq!(outcome.to_string(), "delivered (HTTP 201, 12ms)");
        assert_eq!(
            ProcessOutcome::Skipped(SkipReason::DestinationNotAllowed).to_string(),
            "skipped (destination_not_allowed)"
        );
        assert_eq!(
            ProcessOutcome::Failed(ConnectorError::HttpStatus { status: 502 }).to_string(),
            "failed (HTTP 502)"
        );
    }
}
