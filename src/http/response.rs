//! Client response construction.
//!
//! # Responsibilities
//! - Turn a cached record into an HTTP response
//! - Attach client cache directives and the hit/miss header
//! - Map origin failures to a gateway error

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;

use crate::proxy::{CacheStatus, Served};

/// Diagnostic header carrying `HIT` or `MISS`.
pub const X_SNAP: &str = "x-snap";

/// Build the client response for a served record.
pub fn cached_response(served: &Served, max_age_secs: u64) -> Response {
    let record = &served.response;
    let status = StatusCode::from_u16(record.status()).unwrap_or(StatusCode::BAD_GATEWAY);

    let mut response = Response::new(Body::from(record.body().clone()));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    if let Ok(content_type) = HeaderValue::from_str(record.content_type()) {
        if !record.content_type().is_empty() {
            headers.insert(header::CONTENT_TYPE, content_type);
        }
    }
    headers.insert(header::PRAGMA, HeaderValue::from_static("public"));
    if let Ok(cache_control) = HeaderValue::from_str(&format!("max-age={max_age_secs}, public")) {
        headers.insert(header::CACHE_CONTROL, cache_control);
    }
    headers.insert(X_SNAP, HeaderValue::from_static(served.cache.as_str()));

    response
}

/// Response for a request the origin could not answer.
pub fn origin_unavailable() -> Response {
    let mut response = Response::new(Body::from("Upstream request failed"));
    *response.status_mut() = StatusCode::BAD_GATEWAY;

    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers.insert(X_SNAP, HeaderValue::from_static(CacheStatus::Miss.as_str()));

    response
}
