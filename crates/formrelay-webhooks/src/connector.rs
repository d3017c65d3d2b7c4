//! The generic webhook connector.
//!
//! Responsible for validating the destination, building and signing the
//! JSON payload, executing the HTTP call and logging the result. Failures
//! never escape `process`; they come back as a [`ProcessOutcome`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use formrelay_connector::{
    is_truthy, Connector, ConnectorConfig, ConnectorDescriptor, ConnectorError, ConnectorResult,
    FieldSpec, ProcessOutcome, SkipReason, Submission,
};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde_json::Value;

use crate::crypto::{self, SIGNATURE_HEADER};
use crate::payload::{self, FieldMapping};
use crate::transport::{HttpTransport, OutboundRequest, ReqwestTransport};
use crate::validation::{self, IpAllowlist};

/// Handle of the webhook connector.
pub const WEBHOOK_HANDLE: &str = "webhook";

/// Fixed timeout for webhook requests.
pub const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Descriptor of the webhook connector and its configurable fields.
#[must_use]
pub fn webhook_descriptor() -> ConnectorDescriptor {
    ConnectorDescriptor::new(WEBHOOK_HANDLE, "Webhook")
        .field(
            FieldSpec::text("url", "Webhook URL")
                .instructions("The URL to send the form data to")
                .validate("required_if:webhook_enabled,true|sometimes"),
        )
        .field(
            FieldSpec::select("method", "HTTP Method", ["POST", "PUT", "PATCH"])
                .default_value("POST"),
        )
        .field(
            FieldSpec::text("auth_header", "Authorization Header")
                .instructions("Optional: Bearer token or API key for authentication"),
        )
        .field(
            FieldSpec::text("secret_key", "Secret Key")
                .instructions("Optional: Secret key for request signing (HMAC-SHA256)"),
        )
        .field(
            FieldSpec::textarea("allowed_ips", "Allowed IPs")
                .instructions("Optional: Comma-separated list of allowed IP addresses or hostnames"),
        )
        .field(
            FieldSpec::grid(
                "field_mapping",
                "Field Mapping",
                vec![
                    FieldSpec::text("form_field", "Form Field")
                        .instructions("The handle of the form field")
                        .width(50),
                    FieldSpec::text("webhook_key", "Webhook Key")
                        .instructions("The key to use in the webhook payload")
                        .width(50),
                ],
            )
            .instructions("Map form fields to webhook payload keys"),
        )
}

/// Webhook settings read from an extracted connector config.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WebhookSettings {
    pub url: Option<String>,
    pub method: String,
    pub field_mapping: Vec<FieldMapping>,
    pub auth_header: Option<String>,
    pub secret_key: Option<String>,
    pub allowed_ips: Option<IpAllowlist>,
}

impl WebhookSettings {
    /// Read settings, applying the `POST` default for the method.
    #[must_use]
    pub fn from_config(config: &ConnectorConfig) -> Self {
        let url = config
            .get("url")
            .filter(|v| is_truthy(v))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });

        let allowed_ips = match config.get("allowed_ips") {
            Some(Value::String(s)) if !s.is_empty() => Some(IpAllowlist::parse(s)),
            Some(Value::Array(items)) if !items.is_empty() => Some(IpAllowlist::from_entries(
                items.iter().filter_map(Value::as_str),
            )),
            _ => None,
        };

        Self {
            url,
            method: config.get_str("method").unwrap_or("POST").to_string(),
            field_mapping: payload::parse_field_mappings(config.get("field_mapping")),
            auth_header: config.get_str("auth_header").map(str::to_string),
            secret_key: config.get_str("secret_key").map(str::to_string),
            allowed_ips,
        }
    }

    /// Parsed HTTP method, case-insensitive.
    pub fn http_method(&self) -> ConnectorResult<Method> {
        Method::from_bytes(self.method.trim().to_ascii_uppercase().as_bytes()).map_err(|_| {
            ConnectorError::InvalidMethod {
                method: self.method.clone(),
            }
        })
    }
}

/// Forwards submissions to a configured HTTP endpoint.
pub struct WebhookConnector {
    descriptor: ConnectorDescriptor,
    transport: Arc<dyn HttpTransport>,
}

impl WebhookConnector {
    /// Create a webhook connector with a `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::Internal` if the HTTP client cannot be built.
    pub fn new() -> ConnectorResult<Self> {
        Ok(Self::with_transport(Arc::new(ReqwestTransport::new()?)))
    }

    /// Create a webhook connector using the given transport.
    #[must_use]
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            descriptor: webhook_descriptor(),
            transport,
        }
    }

    /// Request headers for a serialized body.
    fn build_headers(
        &self,
        settings: &WebhookSettings,
        body: &[u8],
        submission: &Submission,
    ) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(ref auth) = settings.auth_header {
            match HeaderValue::from_str(auth) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(e) => {
                    tracing::warn!(
                        target: "formrelay_webhook",
                        form = %submission.form_handle,
                        submission_id = %submission.id,
                        error = %e,
                        "Authorization header is not a valid header value, sending without it"
                    );
                }
            }
        }

        if let Some(ref secret) = settings.secret_key {
            let signature = crypto::signature_header_value(secret, body);
            if let Ok(value) = HeaderValue::from_str(&signature) {
                headers.insert(SIGNATURE_HEADER, value);
            }
        }

        headers
    }
}

#[async_trait]
impl Connector for WebhookConnector {
    fn descriptor(&self) -> &ConnectorDescriptor {
        &self.descriptor
    }

    async fn process(&self, submission: &Submission, config: &ConnectorConfig) -> ProcessOutcome {
        let settings = WebhookSettings::from_config(config);

        let Some(ref raw_url) = settings.url else {
            return ProcessOutcome::Skipped(SkipReason::NotConfigured);
        };

        let url = match validation::validate_webhook_url(raw_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(
                    target: "formrelay_webhook",
                    url = %raw_url,
                    form = %submission.form_handle,
                    submission_id = %submission.id,
                    error = %e,
                    "Invalid webhook URL"
                );
                return ProcessOutcome::Skipped(SkipReason::InvalidDestination);
            }
        };

        let method = match settings.http_method() {
            Ok(method) => method,
            Err(e) => {
                tracing::warn!(
                    target: "formrelay_webhook",
                    url = %url,
                    form = %submission.form_handle,
                    submission_id = %submission.id,
                    error = %e,
                    "Invalid webhook method"
                );
                return ProcessOutcome::Skipped(SkipReason::InvalidMethod);
            }
        };

        if let Some(ref allowlist) = settings.allowed_ips {
            if !allowlist.permits_url(&url).await {
                tracing::warn!(
                    target: "formrelay_webhook",
                    url = %url,
                    form = %submission.form_handle,
                    submission_id = %submission.id,
                    "Webhook URL not in allowed IPs"
                );
                return ProcessOutcome::Skipped(SkipReason::DestinationNotAllowed);
            }
        }

        let payload = payload::build_payload(submission, &settings.field_mapping);
        let body = match serde_json::to_vec(&payload) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(
                    target: "formrelay_webhook",
                    url = %url,
                    form = %submission.form_handle,
                    submission_id = %submission.id,
                    error = %e,
                    "Failed to serialize webhook payload"
                );
                return ProcessOutcome::Failed(e.into());
            }
        };

        let headers = self.build_headers(&settings, &body, submission);
        let request = OutboundRequest {
            method: method.clone(),
            url: url.clone(),
            headers,
            body,
            timeout: WEBHOOK_TIMEOUT,
        };

        match self.transport.send(request).await {
            Ok(response) if response.is_success() => {
                tracing::info!(
                    target: "formrelay_webhook",
                    status = response.status,
                    url = %url,
                    method = %method,
                    form = %submission.form_handle,
                    submission_id = %submission.id,
                    latency_ms = response.latency_ms,
                    "Webhook request successful"
                );
                ProcessOutcome::Delivered {
                    status: response.status,
                    latency_ms: response.latency_ms,
                }
            }
            Ok(response) => {
                tracing::warn!(
                    target: "formrelay_webhook",
                    status = response.status,
                    url = %url,
                    method = %method,
                    form = %submission.form_handle,
                    submission_id = %submission.id,
                    "Webhook request failed"
                );
                ProcessOutcome::Failed(ConnectorError::HttpStatus {
                    status: response.status,
                })
            }
            Err(e) => {
                tracing::error!(
                    target: "formrelay_webhook",
                    error = %e,
                    url = %url,
                    method = %method,
                    form = %submission.form_handle,
                    submission_id = %submission.id,
                    "Webhook request exception"
                );
                ProcessOutcome::Failed(e)
            }
        }
    }
}
