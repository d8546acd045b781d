//! Configuration validation.
//!
//! Semantic checks that serde cannot express. Every problem is collected so
//! the operator sees the full list at once.

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("no origin configured")]
    MissingOrigin,
    #[error("origin `{0}` is not an absolute URL")]
    InvalidOrigin(String),
    #[error("origin scheme `{0}` is not http or https")]
    UnsupportedScheme(String),
    #[error("{field} is not a socket address: `{value}`")]
    InvalidAddress { field: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("timeouts.origin_secs ({origin}) must be below timeouts.request_secs ({request})")]
    OriginTimeoutTooLong { origin: u64, request: u64 },
}

/// Validate a configuration, returning every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let origin = config.origin.trim();
    if origin.is_empty() {
        errors.push(ValidationError::MissingOrigin);
    } else {
        match Url::parse(origin) {
            Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
                errors.push(ValidationError::UnsupportedScheme(url.scheme().to_string()));
            }
            Ok(url) if url.host_str().is_none() => {
                errors.push(ValidationError::InvalidOrigin(origin.to_string()));
            }
            Ok(_) => {}
            Err(_) => errors.push(ValidationError::InvalidOrigin(origin.to_string())),
        }
    }

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if let Some(tls) = &config.tls {
        check_address(&mut errors, "tls.bind_address", &tls.bind_address);
    }
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if config.cache.sweep_interval_secs == 0 {
        errors.push(ValidationError::Zero("cache.sweep_interval_secs"));
    }
    if config.cache.default_ttl_secs == 0 {
        errors.push(ValidationError::Zero("cache.default_ttl_secs"));
    }
    if config.cache.ttl_secs == Some(0) {
        errors.push(ValidationError::Zero("cache.ttl_secs"));
    }

    let timeouts = &config.timeouts;
    for (field, value) in [
        ("timeouts.connect_secs", timeouts.connect_secs),
        ("timeouts.origin_secs", timeouts.origin_secs),
        ("timeouts.request_secs", timeouts.request_secs),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero(field));
        }
    }
    if timeouts.origin_secs >= timeouts.request_secs && timeouts.request_secs > 0 {
        errors.push(ValidationError::OriginTimeoutTooLong {
            origin: timeouts.origin_secs,
            request: timeouts.request_secs,
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
