//! Client identity resolution.
//!
//! The identity is whatever the trusted edge proxy put in its headers. It is
//! not parsed or validated as an IP address, so a deployment that is reachable
//! without going through that proxy can be spoofed trivially.

use axum::http::HeaderMap;
use std::borrow::Cow;

/// Header carrying the edge network's own view of the client IP.
pub const CF_CONNECTING_IP: &str = "cf-connecting-ip";

/// Standard forwarded-for header, used when the edge header is missing.
pub const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Correlation id attached to diagnostic events.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Resolves the client identity from request headers.
///
/// # Precedence
///
/// 1. `CF-Connecting-IP`
/// 2. `X-Forwarded-For`, taken verbatim (a multi-hop chain such as
///    `"203.0.113.7, 10.0.0.1"` is one opaque identity)
///
/// Empty values count as missing. Any other value is used as-is; bytes that
/// are not valid UTF-8 are replaced with `U+FFFD`, so such a client still gets
/// a stable identity. Returns `None` when no identity can be derived, which
/// disables limiting for the request.
pub fn client_addr(headers: &HeaderMap) -> Option<Cow<'_, str>> {
    header_str(headers, CF_CONNECTING_IP).or_else(|| header_str(headers, X_FORWARDED_FOR))
}

/// Returns the inbound `X-Request-Id`, if any.
pub fn request_id(headers: &HeaderMap) -> Option<Cow<'_, str>> {
    header_str(headers, X_REQUEST_ID)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<Cow<'a, str>> {
    headers
        .get(name)
        .map(|v| v.as_bytes())
        .filter(|v| !v.is_empty())
        .map(String::from_utf8_lossy)
}
