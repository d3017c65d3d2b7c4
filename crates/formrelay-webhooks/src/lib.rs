//! Generic HTTP webhook connector for form submissions.
//!
//! Validates the destination URL, enforces an optional IP/hostname
//! allowlist, builds the JSON payload with optional field mapping, signs it
//! with HMAC-SHA256 and delivers it with a fixed 10 second timeout.

pub mod connector;
pub mod crypto;
pub mod payload;
pub mod transport;
pub mod validation;

pub use connector::{webhook_descriptor, WebhookConnector, WebhookSettings, WEBHOOK_HANDLE};
pub use crypto::{compute_hmac_signature, verify_signature_header, SIGNATURE_HEADER};
pub use payload::{build_payload, FieldMapping};
pub use transport::{HttpTransport, OutboundRequest, ReqwestTransport, TransportResponse};
pub use validation::{validate_webhook_url, IpAllowlist};
