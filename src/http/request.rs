//! Inbound request inspection.
//!
//! # Responsibilities
//! - Extract the request-target used for cache keys and origin URLs
//! - Read the request ID assigned by the request-id middleware
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Scheme and authority never reach the cache key

use axum::http::{HeaderMap, Uri};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Path plus query of the inbound request, `/` when the URI has neither.
pub fn request_target(uri: &Uri) -> &str {
    uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
}

/// Request ID set by `SetRequestIdLayer`, or `"unknown"`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_request_target_keeps_query() {
        let uri: Uri = "/search?q=rust&page=2".parse().unwrap();
        assert_eq!(request_target(&uri), "/search?q=rust&page=2");
    }

    #[test]
    fn test_request_target_drops_authority() {
        let uri: Uri = "http://proxy.example:8080/a/b?c".parse().unwrap();
        assert_eq!(request_target(&uri), "/a/b?c");

        let uri: Uri = "http://proxy.example".parse().unwrap();
        assert_eq!(request_target(&uri), "/");
    }

    #[test]
    fn test_request_id() {
        let mut headers = HeaderMap::new();
        assert_eq!(request_id(&headers), "unknown");

        headers.insert(X_REQUEST_ID, HeaderValue::from_static("abc-123"));
        assert_eq!(request_id(&headers), "abc-123");
    }
}
