//! Fuzz target for webhook URL validation and allowlist matching.
//!
//! Validation must never panic, and anything it accepts must be an
//! http(s) URL with a host.
//!
//! Run with:
//! cargo +nightly fuzz run fuzz_webhook_url -- -max_total_time=600

#![no_main]

use std::net::IpAddr;

use arbitrary::Arbitrary;
use formrelay_webhooks::{validate_webhook_url, IpAllowlist};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct UrlInput {
    url: String,
    allowlist: String,
    resolved: Option<[u8; 4]>,
}

fuzz_target!(|input: UrlInput| {
    if input.url.len() > 2048 || input.allowlist.len() > 2048 {
        return;
    }

    if let Ok(url) = validate_webhook_url(&input.url) {
        assert!(matches!(url.scheme(), "http" | "https"));
        assert!(url.host_str().is_some_and(|h| !h.is_empty()));
    }

    let allowlist = IpAllowlist::parse(&input.allowlist);
    for entry in allowlist.entries() {
        assert!(!entry.is_empty());
        assert_eq!(entry.trim(), entry);
    }

    let resolved = input.resolved.map(IpAddr::from);
    let permitted = allowlist.permits(&input.url, resolved);
    if allowlist.is_empty() {
        assert!(!permitted);
    }
});
