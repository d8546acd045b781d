//! Origin access subsystem.
//!
//! # Responsibilities
//! - Issue the outbound request for a request-target
//! - Read the full body, status and content type
//! - Run the body through the content transformer
//! - Map network failures to a single error kind
//!
//! # Design Decisions
//! - Non-2xx replies are results, not errors; they are cached like any other
//! - Every fetch has a connect deadline and a total deadline
//! - No retries; a failed fetch is reported once

pub mod fetcher;

use std::sync::Arc;

use async_trait::async_trait;

use crate::cache::CachedResponse;

pub use fetcher::OriginFetcher;

/// Failure to obtain a reply from the origin.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FetchError {
    #[error("invalid origin URL `{0}`")]
    InvalidUrl(String),
    #[error("origin unreachable at {url}: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: Arc<reqwest::Error>,
    },
    #[error("origin fetch ended without a result")]
    Abandoned,
}

impl FetchError {
    pub(crate) fn unreachable(url: &str, source: reqwest::Error) -> Self {
        Self::Unreachable {
            url: url.to_string(),
            source: Arc::new(source),
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Unreachable { source, .. } if source.is_timeout())
    }
}

/// Something that can answer a request-target with a cacheable record.
#[async_trait]
pub trait Origin: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<CachedResponse, FetchError>;
}
