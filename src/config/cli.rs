//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use crate::config::loader::{read_config, ConfigError};
use crate::config::schema::{LogFormat, ProxyConfig};
use crate::config::validation::validate_config;

/// Command-line arguments for the proxy binary.
#[derive(Debug, Parser)]
#[command(name = "snap-proxy", version, about = "Caching reverse proxy for a single origin")]
pub struct Cli {
    /// Base URL of the origin server.
    #[arg(value_name = "ORIGIN")]
    pub origin: String,

    /// Port for the plain HTTP listener.
    #[arg(value_name = "PORT", default_value_t = 80)]
    pub port: u16,

    /// Optional TOML file with the remaining settings.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Port for the HTTPS listener [default: 443].
    #[arg(long)]
    pub tls_port: Option<u16>,

    /// Certificate chain (PEM) for the HTTPS listener [default: ssl/public.crt].
    #[arg(long, value_name = "PATH")]
    pub tls_cert: Option<PathBuf>,

    /// Private key (PEM) for the HTTPS listener [default: ssl/private.key].
    #[arg(long, value_name = "PATH")]
    pub tls_key: Option<PathBuf>,

    /// Serve plain HTTP only.
    #[arg(long)]
    pub no_tls: bool,

    /// Log line format.
    #[arg(long, value_parser = ["pretty", "json"])]
    pub log_format: Option<String>,
}

impl Cli {
    /// Build the effective configuration: defaults, then the file (if any),
    /// then arguments, then validation.
    pub fn into_config(self) -> Result<ProxyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ProxyConfig::default(),
        };

        config.origin = self.origin;
        config.listener.bind_address = format!("0.0.0.0:{}", self.port);

        config.tls = if self.no_tls {
            None
        } else {
            let mut tls = config.tls.take().unwrap_or_default();
            if let Some(port) = self.tls_port {
                tls.bind_address = format!("0.0.0.0:{port}");
            }
            if let Some(cert) = &self.tls_cert {
                tls.cert_path = cert.to_string_lossy().into_owned();
            }
            if let Some(key) = &self.tls_key {
                tls.key_path = key.to_string_lossy().into_owned();
            }
            Some(tls)
        };

        match self.log_format.as_deref() {
            Some("json") => config.observability.log_format = LogFormat::Json,
            Some("pretty") => config.observability.log_format = LogFormat::Pretty,
            _ => {}
        }

        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_and_default_port() {
        let cli = Cli::try_parse_from(["snap-proxy", "http://localhost:3000"]).unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.origin, "http://localhost:3000");
        assert_eq!(config.listener.bind_address, "0.0.0.0:80");

        let tls = config.tls.unwrap();
        assert_eq!(tls.bind_address, "0.0.0.0:443");
        assert_eq!(tls.cert_path, "ssl/public.crt");
        assert_eq!(tls.key_path, "ssl/private.key");
    }

    #[test]
    fn test_explicit_port_and_no_tls() {
        let cli = Cli::try_parse_from([
            "snap-proxy",
            "https://example.com",
            "8080",
            "--no-tls",
            "--log-format",
            "json",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert!(config.tls.is_none());
        assert_eq!(config.observability.log_format, LogFormat::Json);
    }

    #[test]
    fn test_file_settings_survive_unless_overridden() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(
            &mut file,
            br#"
                [tls]
                bind_address = "0.0.0.0:8443"
                cert_path = "/etc/snap/cert.pem"

                [cache]
                ttl_secs = 120
            "#,
        )
        .unwrap();

        let path = file.path().to_string_lossy().into_owned();
        let cli = Cli::try_parse_from([
            "snap-proxy",
            "http://localhost:3000",
            "--config",
            path.as_str(),
            "--tls-key",
            "/etc/snap/key.pem",
        ])
        .unwrap();
        let config = cli.into_config().unwrap();

        let tls = config.tls.unwrap();
        assert_eq!(tls.bind_address, "0.0.0.0:8443");
        assert_eq!(tls.cert_path, "/etc/snap/cert.pem");
        assert_eq!(tls.key_path, "/etc/snap/key.pem");
        assert_eq!(config.cache.ttl_secs, Some(120));
    }

    #[test]
    fn test_origin_is_required() {
        assert!(Cli::try_parse_from(["snap-proxy"]).is_err());
    }

    #[test]
    fn test_invalid_origin_is_fatal() {
        let cli = Cli::try_parse_from(["snap-proxy", "not a url"]).unwrap();
        assert!(matches!(cli.into_config(), Err(ConfigError::Validation(_))));
    }
}
