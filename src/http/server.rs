//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the catch-all proxy handler
//! - Wire up middleware (request ID, tracing, timeout, compression)
//! - Own the cache store and its sweeper
//! - Serve plain HTTP, plus HTTPS when configured
//! - Stop everything on the shutdown signal

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::{HeaderMap, Method, Uri},
    response::Response,
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::cache::{CacheStore, CachedResponse, Sweeper};
use crate::config::ProxyConfig;
use crate::http::request::{request_id, request_target};
use crate::http::response::{cached_response, origin_unavailable};
use crate::net::tls;
use crate::observability::metrics;
use crate::origin::{FetchError, Origin, OriginFetcher};
use crate::proxy::{Orchestrator, OrchestratorSettings};
use crate::transform::ContentTransformer;

/// Failures while starting or running the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("origin setup failed: {0}")]
    Origin(#[from] FetchError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid address `{0}`")]
    Address(String),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub max_age_secs: u64,
}

/// HTTP server for the caching proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    store: Arc<CacheStore<CachedResponse>>,
}

impl HttpServer {
    /// Create a server that fetches from `config.origin` over HTTP.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let transformer = ContentTransformer::new(config.cache.minify_html);
        let fetcher = OriginFetcher::new(&config.origin, &config.timeouts, transformer)?;
        Ok(Self::with_origin(config, Arc::new(fetcher)))
    }

    /// Create a server around any [`Origin`] implementation.
    pub fn with_origin(config: ProxyConfig, origin: Arc<dyn Origin>) -> Self {
        let store = Arc::new(CacheStore::new(config.cache.default_ttl()));
        let orchestrator = Orchestrator::new(
            Arc::clone(&store),
            origin,
            OrchestratorSettings::from(&config.cache),
        );

        let state = AppState {
            orchestrator: Arc::new(orchestrator),
            max_age_secs: config.cache.max_age_secs,
        };

        let router = Self::build_router(&config, state);
        Self {
            router,
            config,
            store,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(CompressionLayer::new())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            origin = %self.config.origin,
            "HTTP server starting"
        );

        Sweeper::new(Arc::clone(&self.store), self.config.cache.sweep_interval())
            .spawn(shutdown.resubscribe());

        let https = match &self.config.tls {
            Some(tls_config) => {
                tls::spawn_https(tls_config, self.router.clone(), shutdown.resubscribe()).await?
            }
            None => None,
        };

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;
        tracing::info!("HTTP server stopped");

        // HTTPS drains on the same signal; wait so its requests finish too.
        if let Some(https) = https {
            if let Err(e) = https.await {
                tracing::error!(error = %e, "HTTPS server task failed");
            }
        }
        Ok(())
    }

    /// Shared handle to the response store.
    pub fn store(&self) -> Arc<CacheStore<CachedResponse>> {
        Arc::clone(&self.store)
    }
}

/// Catch-all handler: every method and path is answered from the cache or the origin.
async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);
    let target = request_target(&uri);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        uri = %target,
        "Proxying request"
    );

    let (response, cache) = match state.orchestrator.handle(&method, target).await {
        Ok(served) => (cached_response(&served, state.max_age_secs), served.cache.as_str()),
        Err(e) => {
            tracing::warn!(request_id = %request_id, uri = %target, error = %e, "Origin unavailable");
            (origin_unavailable(), "MISS")
        }
    };

    let status = response.status().as_u16();
    metrics::record_request(method.as_str(), status, cache, start_time);
    tracing::info!(
        request_id = %request_id,
        method = %method,
        uri = %target,
        status,
        cache,
        elapsed = ?start_time.elapsed(),
        "Request served"
    );

    response
}
