//! Per-request cache/fetch decision.

use std::sync::Arc;

use axum::http::Method;
use tokio::task::JoinHandle;

use crate::cache::{CacheKey, CacheStore, CachedResponse, Expiration, Flight, FlightGuard, InFlight};
use crate::config::CacheConfig;
use crate::origin::{FetchError, Origin};

type FetchResult = Result<Arc<CachedResponse>, FetchError>;

/// Whether a response came from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// A record ready to be written to the client.
#[derive(Debug, Clone)]
pub struct Served {
    pub response: Arc<CachedResponse>,
    pub cache: CacheStatus,
}

/// Knobs taken from [`CacheConfig`].
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorSettings {
    /// Expiration applied to entries stored after a miss.
    pub expiration: Expiration,
    pub coalesce_misses: bool,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            expiration: Expiration::Never,
            coalesce_misses: true,
        }
    }
}

impl From<&CacheConfig> for OrchestratorSettings {
    fn from(config: &CacheConfig) -> Self {
        Self {
            expiration: config.ttl_secs.map(std::time::Duration::from_secs).into(),
            coalesce_misses: config.coalesce_misses,
        }
    }
}

/// Ties the key deriver, store and origin together for one request at a time.
pub struct Orchestrator {
    store: Arc<CacheStore<CachedResponse>>,
    origin: Arc<dyn Origin>,
    inflight: InFlight<FetchResult>,
    settings: OrchestratorSettings,
}

impl Orchestrator {
    pub fn new(
        store: Arc<CacheStore<CachedResponse>>,
        origin: Arc<dyn Origin>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            store,
            origin,
            inflight: InFlight::new(),
            settings,
        }
    }

    pub fn store(&self) -> &Arc<CacheStore<CachedResponse>> {
        &self.store
    }

    /// Answer `method uri` from the cache or the origin.
    ///
    /// Only `GET` reads or writes the cache. An unreachable origin yields an
    /// error and leaves the cache untouched.
    pub async fn handle(&self, method: &Method, uri: &str) -> Result<Served, FetchError> {
        if method != Method::GET {
            let response = self.origin.fetch(uri).await?;
            return Ok(Served {
                response: Arc::new(response),
                cache: CacheStatus::Miss,
            });
        }

        let key = CacheKey::derive(uri);
        if let Some(response) = self.store.get(&key) {
            tracing::trace!(%key, uri, "Cache hit");
            return Ok(Served {
                response,
                cache: CacheStatus::Hit,
            });
        }

        tracing::trace!(%key, uri, "Cache miss");
        self.fetch_and_store(key, uri).await
    }

    async fn fetch_and_store(&self, key: CacheKey, uri: &str) -> Result<Served, FetchError> {
        if !self.settings.coalesce_misses {
            let response = join(self.spawn_fetch(key, uri, None)).await?;
            return Ok(Served {
                response,
                cache: CacheStatus::Miss,
            });
        }

        let response = match self.inflight.join(key) {
            Flight::Follower(waiter) => {
                tracing::trace!(%key, uri, "Awaiting in-flight fetch");
                waiter.wait().await.map_err(|_| FetchError::Abandoned)??
            }
            Flight::Leader(guard) => {
                // A fetch for this key may have finished between lookup and join.
                if let Some(response) = self.store.get(&key) {
                    guard.complete(Ok(Arc::clone(&response)));
                    return Ok(Served {
                        response,
                        cache: CacheStatus::Hit,
                    });
                }
                join(self.spawn_fetch(key, uri, Some(guard))).await?
            }
        };

        Ok(Served {
            response,
            cache: CacheStatus::Miss,
        })
    }

    fn spawn_fetch(
        &self,
        key: CacheKey,
        uri: &str,
        guard: Option<FlightGuard<FetchResult>>,
    ) -> JoinHandle<FetchResult> {
        let origin = Arc::clone(&self.origin);
        let store = Arc::clone(&self.store);
        let expiration = self.settings.expiration;
        let uri = uri.to_string();

        tokio::spawn(async move {
            let result = origin.fetch(&uri).await.map(Arc::new);
            match &result {
                Ok(response) => store.put_shared(key, Arc::clone(response), expiration),
                Err(e) => tracing::warn!(%key, uri = %uri, error = %e, "Origin fetch failed"),
            }
            if let Some(guard) = guard {
                guard.complete(result.clone());
            }
            result
        })
    }
}

async fn join(handle: JoinHandle<FetchResult>) -> FetchResult {
    match handle.await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!(error = %e, "Origin fetch task failed");
            Err(FetchError::Abandoned)
        }
    }
}
