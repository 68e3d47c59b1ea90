//! Request ID generation for request tracing.
//!
//! Requests reuse the caller's `x-request-id` when one is sent, otherwise a
//! UUID is generated. Connections get a cheaper counter based ID.

use hyper::header::HeaderMap;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Header carrying the request ID in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Counter for connection IDs.
static CONNECTION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new UUID-based request ID.
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a connection ID based on a process-wide counter.
///
/// Format: `conn-{counter}` where counter is zero-padded to 16 hex digits.
pub fn generate_connection_id() -> String {
    let count = CONNECTION_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("conn-{:016x}", count)
}

/// Request ID wrapper that can be included in tracing spans.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    /// Create a new random request ID.
    pub fn new() -> Self {
        Self(generate_request_id())
    }

    /// Take the ID from the request headers, or generate one.
    ///
    /// Empty or non-visible-ASCII header values are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(Self::from_string)
            .unwrap_or_default()
    }

    /// Create a request ID from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the request ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RequestId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;
    use std::collections::HashSet;

    #[test]
    fn test_generate_request_id() {
        let id1 = generate_request_id();
        let id2 = generate_request_id();

        assert_ne!(id1, id2);
        // 36 chars with hyphens
        assert_eq!(id1.len(), 36);
        assert!(id1.contains('-'));
    }

    #[test]
    fn test_connection_id_uniqueness() {
        let mut ids = HashSet::new();
        for _ in 0..1000 {
            let id = generate_connection_id();
            assert!(id.starts_with("conn-"));
            assert!(ids.insert(id), "duplicate ID generated");
        }
    }

    #[test]
    fn test_request_id_from_header() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("abc-123"));
        assert_eq!(RequestId::from_headers(&headers).as_str(), "abc-123");
    }

    #[test]
    fn test_request_id_generated_when_missing() {
        let mut headers = HeaderMap::new();
        assert_eq!(RequestId::from_headers(&headers).as_str().len(), 36);

        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("  "));
        assert_eq!(RequestId::from_headers(&headers).as_str().len(), 36);
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::from_string("test-id-123");
        assert_eq!(format!("{}", id), "test-id-123");
    }
}
