//! Configuration schema.
//!
//! Every section has defaults, so a config file only needs the keys it
//! changes and the origin can come from the command line alone.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the caching proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Base URL of the origin server (e.g., "http://127.0.0.1:3000").
    pub origin: String,

    /// Plain HTTP listener.
    pub listener: ListenerConfig,

    /// Optional HTTPS listener.
    pub tls: Option<TlsConfig>,

    /// Response cache settings.
    pub cache: CacheConfig,

    /// Origin and inbound deadlines.
    pub timeouts: TimeoutConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Plain HTTP listener.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:80").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:80".to_string(),
        }
    }
}

/// HTTPS listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TlsConfig {
    /// Bind address for the HTTPS listener.
    pub bind_address: String,

    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:443".to_string(),
            cert_path: "ssl/public.crt".to_string(),
            key_path: "ssl/private.key".to_string(),
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime of entries stored by the proxy. `None` keeps them until restart.
    pub ttl_secs: Option<u64>,

    /// TTL behind `Expiration::Default` in the response store. Proxied
    /// responses follow `ttl_secs` instead, so this only affects code that
    /// inserts into the store directly.
    pub default_ttl_secs: u64,

    /// Interval between expiry sweeps.
    pub sweep_interval_secs: u64,

    /// Value advertised to clients in `Cache-Control: max-age`.
    pub max_age_secs: u64,

    /// Allow at most one in-flight origin fetch per cache key.
    pub coalesce_misses: bool,

    /// Minify `text/html` bodies before caching.
    pub minify_html: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: None,
            default_ttl_secs: 6 * 60 * 60,
            sweep_interval_secs: 60 * 60,
            max_age_secs: 84_097,
            coalesce_misses: true,
            minify_html: true,
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Deadlines, in seconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Origin connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time allowed for one origin fetch, body included, in seconds.
    pub origin_secs: u64,

    /// Inbound request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            origin_secs: 30,
            request_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Logging and metrics settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log line format.
    pub log_format: LogFormat,

    /// Serve Prometheus metrics.
    pub metrics_enabled: bool,

    /// Address of the Prometheus scrape listener.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
