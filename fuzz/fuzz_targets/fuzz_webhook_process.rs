//! Fuzz target for webhook processing.
//!
//! Drives `WebhookConnector::process` with arbitrary settings and
//! submission data over an in-memory transport. Processing must always
//! return an outcome.
//!
//! Run with:
//! cargo +nightly fuzz run fuzz_webhook_process -- -max_total_time=600

#![no_main]

use std::sync::Arc;

use arbitrary::Arbitrary;
use async_trait::async_trait;
use formrelay_connector::{Connector, ConnectorConfig, ConnectorResult, Submission};
use formrelay_webhooks::{HttpTransport, OutboundRequest, TransportResponse, WebhookConnector};
use libfuzzer_sys::fuzz_target;
use serde_json::{json, Value};

/// Answers every request with a fixed status, off the network.
struct FixedTransport(u16);

#[async_trait]
impl HttpTransport for FixedTransport {
    async fn send(&self, request: OutboundRequest) -> ConnectorResult<TransportResponse> {
        assert!(serde_json::from_slice::<Value>(&request.body).is_ok());
        Ok(TransportResponse {
            status: self.0,
            latency_ms: 0,
        })
    }
}

#[derive(Arbitrary, Debug)]
struct ProcessInput {
    url: String,
    method: Option<String>,
    auth_header: Option<String>,
    secret_key: Option<String>,
    mappings: Vec<(String, String)>,
    data: Vec<(String, String)>,
    status: u16,
}

fuzz_target!(|input: ProcessInput| {
    if input.url.len() > 1024 || input.mappings.len() > 32 || input.data.len() > 32 {
        return;
    }

    let mut config = ConnectorConfig::new("webhook").with("url", input.url);
    if let Some(method) = input.method {
        config = config.with("method", method);
    }
    if let Some(auth) = input.auth_header {
        config = config.with("auth_header", auth);
    }
    if let Some(secret) = input.secret_key {
        config = config.with("secret_key", secret);
    }
    if !input.mappings.is_empty() {
        let rows: Vec<Value> = input
            .mappings
            .into_iter()
            .map(|(form_field, webhook_key)| json!({"form_field": form_field, "webhook_key": webhook_key}))
            .collect();
        config = config.with("field_mapping", rows);
    }

    let mut submission = Submission::new("fuzz", "form");
    for (key, value) in input.data {
        submission = submission.with_field(key, value);
    }

    let connector = WebhookConnector::with_transport(Arc::new(FixedTransport(input.status)));
    let Ok(runtime) = tokio::runtime::Builder::new_current_thread().build() else {
        return;
    };
    let outcome = runtime.block_on(connector.process(&submission, &config));
    let _ = outcome.as_str();
});
