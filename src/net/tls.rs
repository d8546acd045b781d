//! TLS configuration and the HTTPS listener.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::TlsConfig;
use crate::http::server::ServerError;

/// Grace period for in-flight HTTPS requests at shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Load TLS configuration from certificate and key files.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig, std::io::Error> {
    if !cert_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Certificate file not found: {:?}", cert_path),
        ));
    }
    if !key_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Private key file not found: {:?}", key_path),
        ));
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}

/// Start the HTTPS listener in the background.
///
/// Missing certificate files only disable HTTPS; unreadable or invalid ones
/// are a startup error.
pub async fn spawn_https(
    config: &TlsConfig,
    app: Router,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<Option<JoinHandle<()>>, ServerError> {
    let addr: SocketAddr = config
        .bind_address
        .parse()
        .map_err(|_| ServerError::Address(config.bind_address.clone()))?;

    let rustls = match load_tls_config(Path::new(&config.cert_path), Path::new(&config.key_path)).await {
        Ok(rustls) => rustls,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!(error = %e, "HTTPS disabled");
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    let handle = Handle::new();
    let drain = handle.clone();
    tokio::spawn(async move {
        let _ = shutdown.recv().await;
        drain.graceful_shutdown(Some(DRAIN_TIMEOUT));
    });

    tracing::info!(address = %addr, "HTTPS server starting");
    let server = axum_server::bind_rustls(addr, rustls)
        .handle(handle)
        .serve(app.into_make_service());

    Ok(Some(tokio::spawn(async move {
        if let Err(e) = server.await {
            tracing::error!(error = %e, "HTTPS server failed");
        }
        tracing::info!("HTTPS server stopped");
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Shutdown;

    #[tokio::test]
    async fn test_missing_files_disable_https() {
        let config = TlsConfig {
            bind_address: "127.0.0.1:0".to_string(),
            cert_path: "/nonexistent/public.crt".to_string(),
            key_path: "/nonexistent/private.key".to_string(),
        };
        let shutdown = Shutdown::new();
        let spawned = spawn_https(&config, Router::new(), shutdown.subscribe()).await.unwrap();
        assert!(spawned.is_none());
    }

    #[tokio::test]
    async fn test_garbage_pem_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("public.crt");
        let key = dir.path().join("private.key");
        std::fs::write(&cert, "not a certificate").unwrap();
        std::fs::write(&key, "not a key").unwrap();

        let config = TlsConfig {
            bind_address: "127.0.0.1:0".to_string(),
            cert_path: cert.to_string_lossy().into_owned(),
            key_path: key.to_string_lossy().into_owned(),
        };
        let shutdown = Shutdown::new();
        assert!(spawn_https(&config, Router::new(), shutdown.subscribe()).await.is_err());
    }

    #[tokio::test]
    async fn test_bad_address() {
        let config = TlsConfig {
            bind_address: "nowhere".to_string(),
            ..TlsConfig::default()
        };
        let shutdown = Shutdown::new();
        let err = spawn_https(&config, Router::new(), shutdown.subscribe()).await.unwrap_err();
        assert!(matches!(err, ServerError::Address(_)));
    }
}
