//! Outbound HTTP transport.
//!
//! The connector talks to the network only through [`HttpTransport`], so
//! tests and embedders can substitute their own implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use formrelay_connector::{ConnectorError, ConnectorResult};
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use url::Url;

/// A fully built outbound request.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
    /// Serialized JSON body; these exact bytes are sent.
    pub body: Vec<u8>,
    pub timeout: Duration,
}

/// Status and timing of a completed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub latency_ms: u64,
}

impl TransportResponse {
    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends outbound requests.
///
/// Returns an error only for transport-level failures; any HTTP status,
/// including 4xx/5xx, is a response.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> ConnectorResult<TransportResponse>;
}

/// [`HttpTransport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport with its own client. Redirects are not followed.
    ///
    /// # Errors
    ///
    /// Returns `ConnectorError::Internal` if the HTTP client cannot be built.
    pub fn new() -> ConnectorResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("formrelay-webhooks/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ConnectorError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> ConnectorResult<TransportResponse> {
        let timeout = request.timeout;
        let start = Instant::now();

        let result = self
            .client
            .request(request.method, request.url)
            .headers(request.headers)
            .timeout(timeout)
            .body(request.body)
            .send()
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(response) => Ok(TransportResponse {
                status: response.status().as_u16(),
                latency_ms,
            }),
            Err(e) if e.is_timeout() => Err(ConnectorError::Timeout {
                timeout_secs: timeout.as_secs(),
            }),
            Err(e) if e.is_connect() => Err(ConnectorError::connection_failed_with_source(
                format!("Connection failed: {e}"),
                e,
            )),
            Err(e) => Err(ConnectorError::transport_with_source(e.to_string(), e)),
        }
    }
}
