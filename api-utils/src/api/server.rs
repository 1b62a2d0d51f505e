//! HTTP server startup

use std::future::IntoFuture;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::StatusCode;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use super::middleware::not_found;
use crate::core::config::ServerConfig;
use crate::core::shutdown::ShutdownService;

/// Add the 404 fallback, request tracing and the read timeout
pub fn finalize_router(router: Router, config: &ServerConfig) -> Router {
    router
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.read_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Serve `router` until the process is killed
pub async fn start_server(router: Router, config: &ServerConfig) -> Result<()> {
    let listener = bind(config).await?;
    axum::serve(listener, finalize_router(router, config))
        .await
        .context("Server is not running")?;
    Ok(())
}

/// Serve `router` until Ctrl+C or SIGTERM, then drain in-flight requests
pub async fn start_server_with_graceful_shutdown(
    router: Router,
    config: &ServerConfig,
) -> Result<()> {
    let shutdown = ShutdownService::new();
    shutdown.install_signal_handlers();
    serve_until(router, config, &shutdown).await
}

/// Serve `router` until `shutdown` is triggered
pub async fn serve_until(
    router: Router,
    config: &ServerConfig,
    shutdown: &ShutdownService,
) -> Result<()> {
    let listener = bind(config).await?;
    let server = axum::serve(listener, finalize_router(router, config))
        .with_graceful_shutdown(shutdown.wait())
        .into_future();

    tokio::select! {
        result = server => {
            result.context("Server is not shutting down")?;
            tracing::info!("Server stopped");
        }
        _ = shutdown.deadline() => {
            tracing::warn!(
                grace_secs = shutdown.grace().as_secs(),
                "Timeout waiting for in-flight requests, stopping anyway"
            );
        }
    }
    Ok(())
}

async fn bind(config: &ServerConfig) -> Result<TcpListener> {
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(address = %addr, "Server listening");
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    fn config(port: u16) -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port,
            read_timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn test_finalized_router_has_json_404() {
        let router = finalize_router(Router::new().route("/", get(|| async { "ok" })), &config(0));
        let response = router
            .oneshot(
                axum::http::Request::builder()
                    .uri("/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "notFound");
    }

    #[tokio::test]
    async fn test_serve_until_stops_on_trigger() {
        let shutdown = ShutdownService::new();
        let server_shutdown = shutdown.clone();
        let handle = tokio::spawn(async move {
            serve_until(Router::new(), &config(0), &server_shutdown).await
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown.trigger();

        let result = tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
