//! Startup orchestration.
//!
//! Order: metrics, origin client, listener, signal handling, serve.
//! Any failure before the listener accepts traffic is fatal.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ProxyConfig;
use crate::http::server::{HttpServer, ServerError};
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;

/// Bring the proxy up and serve until a stop signal arrives.
pub async fn run(config: ProxyConfig) -> Result<(), ServerError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    tracing::info!(
        origin = %config.origin,
        bind_address = %config.listener.bind_address,
        https = config.tls.is_some(),
        ttl_secs = ?config.cache.ttl_secs,
        coalesce_misses = config.cache.coalesce_misses,
        "Configuration loaded"
    );

    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config)?;
    let listener = TcpListener::bind(&bind_address).await?;

    let shutdown = Shutdown::new();
    signals::forward_signals(&shutdown);

    server.run(listener, shutdown.subscribe()).await
}
