//! URL validation and IP allowlisting for webhook destinations.
//!
//! Validates webhook URLs against:
//! - Format (absolute URL with a host)
//! - Protocol (`http` or `https` only)
//! - An optional allowlist of IPs/hostnames
//!
//! The allowlist is plain string equality against the resolved IP or the
//! raw host. CIDR ranges are not understood; an entry like `10.0.0.0/8`
//! only matches a host literally spelled that way.

use std::net::IpAddr;

use formrelay_connector::ConnectorError;
use url::{Host, Url};

// ---------------------------------------------------------------------------
// URL validation
// ---------------------------------------------------------------------------

/// Validate a webhook delivery URL.
///
/// Checks:
/// 1. URL is parseable as an absolute URL
/// 2. Scheme is `http` or `https`
/// 3. URL has a host
pub fn validate_webhook_url(raw: &str) -> Result<Url, ConnectorError> {
    let parsed = Url::parse(raw.trim())
        .map_err(|e| ConnectorError::invalid_url(format!("Invalid URL format: {e}")))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ConnectorError::invalid_url(format!(
                "Unsupported URL scheme: {scheme}"
            )));
        }
    }

    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(parsed),
        _ => Err(ConnectorError::invalid_url("URL must have a host")),
    }
}

// ---------------------------------------------------------------------------
// IP allowlist
// ---------------------------------------------------------------------------

/// Comma-separated allowlist of IP addresses and hostnames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpAllowlist {
    entries: Vec<String>,
}

impl IpAllowlist {
    /// Parse a comma-separated list; entries are trimmed, blanks dropped.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::from_entries(raw.split(','))
    }

    /// Build from individual entries; entries are trimmed, blanks dropped.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|e| e.as_ref().trim().to_string())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether the host or its resolved IP matches an entry exactly.
    #[must_use]
    pub fn permits(&self, host: &str, resolved: Option<IpAddr>) -> bool {
        let resolved = resolved.map(|ip| ip.to_string());
        self.entries
            .iter()
            .any(|entry| entry == host || resolved.as_deref() == Some(entry.as_str()))
    }

    /// Resolve the URL's host and check it against the allowlist.
    pub async fn permits_url(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let resolved = resolve_host(url).await;
        self.permits(host, resolved)
    }
}

/// Resolve the URL's host to a single IP address.
///
/// IP literals resolve to themselves. Hostnames resolve to their first IPv4
/// address, falling back to the first address of any family. Resolution
/// failures yield `None`.
pub async fn resolve_host(url: &Url) -> Option<IpAddr> {
    match url.host()? {
        Host::Ipv4(ip) => Some(IpAddr::V4(ip)),
        Host::Ipv6(ip) => Some(IpAddr::V6(ip)),
        Host::Domain(domain) => {
            let port = url.port_or_known_default().unwrap_or(80);
            match tokio::net::lookup_host((domain, port)).await {
                Ok(addrs) => {
                    let ips: Vec<IpAddr> = addrs.map(|a| a.ip()).collect();
                    ips.iter()
                        .find(|ip| ip.is_ipv4())
                        .or_else(|| ips.first())
                        .copied()
                }
                Err(e) => {
                    tracing::debug!(
                        target: "formrelay_webhook",
                        host = %domain,
                        error = %e,
                        "DNS resolution failed"
                    );
                    None
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
