//! Caching Reverse Proxy
//!
//! Forwards every request to one origin, minifies HTML replies and keeps
//! GET responses in memory so repeat requests never reach the origin.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────────┐
//!                          │                  SNAP PROXY                       │
//!                          │                                                   │
//!     Client Request       │  ┌─────────┐    ┌──────────────┐    ┌─────────┐   │
//!     ─────────────────────┼─▶│  http   │───▶│ orchestrator │───▶│  cache  │   │
//!                          │  │ server  │    │  (GET only)  │◀───│  store  │   │
//!                          │  └─────────┘    └──────┬───────┘    └─────────┘   │
//!                          │                        │ miss                      │
//!                          │                        ▼                           │
//!     Client Response      │  ┌─────────┐    ┌──────────────┐    ┌─────────┐   │
//!     ◀────────────────────┼──│response │◀───│  transform   │◀───│ origin  │◀──┼── Origin
//!                          │  │ headers │    │ (HTML minify)│    │ fetcher │   │   Server
//!                          │  └─────────┘    └──────────────┘    └─────────┘   │
//!                          └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;

use snap_proxy::config::Cli;
use snap_proxy::lifecycle::startup;
use snap_proxy::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init_logging(&config.observability);
    tracing::info!("snap-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
