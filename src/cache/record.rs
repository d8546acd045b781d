//! Cached origin replies.

use bytes::Bytes;

/// One origin reply as stored in the cache.
///
/// Fields are private so a record cannot change after construction; the
/// store hands out `Arc<CachedResponse>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    body: Bytes,
    status: u16,
    content_type: String,
}

impl CachedResponse {
    pub fn new(status: u16, content_type: impl Into<String>, body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            status,
            content_type: content_type.into(),
        }
    }

    /// Payload, after any transformation.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// HTTP status returned by the origin.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Origin's `Content-Type`, empty when it sent none.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }
}
