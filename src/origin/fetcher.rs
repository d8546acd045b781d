//! HTTP origin fetcher.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::cache::CachedResponse;
use crate::config::TimeoutConfig;
use crate::observability::metrics;
use crate::origin::{FetchError, Origin};
use crate::transform::ContentTransformer;

/// Fetches request-targets from a fixed origin with `GET`.
pub struct OriginFetcher {
    base: String,
    client: reqwest::Client,
    transformer: ContentTransformer,
}

impl OriginFetcher {
    /// Build a fetcher for `base` (scheme, host and optional path prefix).
    pub fn new(
        base: &str,
        timeouts: &TimeoutConfig,
        transformer: ContentTransformer,
    ) -> Result<Self, FetchError> {
        let base = base.trim().trim_end_matches('/');
        Url::parse(base).map_err(|_| FetchError::InvalidUrl(base.to_string()))?;

        let client = reqwest::Client::builder()
            .no_proxy()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.origin_secs))
            .build()
            .map_err(|e| FetchError::unreachable(base, e))?;

        Ok(Self {
            base: base.to_string(),
            client,
            transformer,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute URL for a request-target.
    pub fn url_for(&self, uri: &str) -> String {
        if uri.starts_with('/') {
            format!("{}{}", self.base, uri)
        } else {
            format!("{}/{}", self.base, uri)
        }
    }
}

#[async_trait]
impl Origin for OriginFetcher {
    async fn fetch(&self, uri: &str) -> Result<CachedResponse, FetchError> {
        let url = self.url_for(uri);
        let start = Instant::now();

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                let err = FetchError::unreachable(&url, e);
                let outcome = if err.is_timeout() { "timeout" } else { "unreachable" };
                metrics::record_origin_fetch(outcome, start);
                return Err(err);
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        // Consumes the response; the connection goes back to the pool or is closed.
        let body = match response.bytes().await {
            Ok(body) => body,
            Err(e) => {
                metrics::record_origin_fetch("body_error", start);
                return Err(FetchError::unreachable(&url, e));
            }
        };

        let original_len = body.len();
        let body = self.transformer.apply(body, &content_type);

        tracing::debug!(
            url = %url,
            status,
            content_type = %content_type,
            original_bytes = original_len,
            stored_bytes = body.len(),
            elapsed = ?start.elapsed(),
            "Fetched from origin"
        );
        metrics::record_origin_fetch("ok", start);

        Ok(CachedResponse::new(status, content_type, body))
    }
}
