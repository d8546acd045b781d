//! Caching reverse proxy for a single origin.

// Caching pipeline
pub mod cache;
pub mod origin;
pub mod proxy;
pub mod transform;

// Serving
pub mod config;
pub mod http;
pub mod net;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use cache::{CacheKey, CacheStore, CachedResponse, Expiration};
pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use proxy::{CacheStatus, Orchestrator};
