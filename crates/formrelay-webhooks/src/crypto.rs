//! HMAC-SHA256 payload signing.
//!
//! The signature covers the exact body bytes sent to the destination and is
//! delivered as `X-Signature-SHA256: sha256=<hex>`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the payload signature.
pub const SIGNATURE_HEADER: &str = "X-Signature-SHA256";

/// Prefix of the signature header value.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Compute the hex-encoded HMAC-SHA256 of `body` keyed with `secret`.
pub fn compute_hmac_signature(secret: &str, body: &[u8]) -> String {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(body);
    hex::encode(mac.finalize().into_bytes())
}

/// Full signature header value, `sha256=<hex>`.
pub fn signature_header_value(secret: &str, body: &[u8]) -> String {
    format!("{SIGNATURE_PREFIX}{}", compute_hmac_signature(secret, body))
}

/// Verify a received `sha256=<hex>` header value using constant-time comparison.
///
/// For receivers; the connector itself only signs.
pub fn verify_signature_header(header_value: &str, secret: &str, body: &[u8]) -> bool {
    let Some(received) = header_value.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };
    let computed = compute_hmac_signature(secret, body);
    constant_time_eq(received.as_bytes(), computed.as_bytes())
}

/// Constant-time byte comparison to prevent timing attacks.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    use subtle::ConstantTimeEq;
    a.ct_eq(b).into()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
