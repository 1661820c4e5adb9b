//! CyberAI gateway server.
//!
//! Mounts the BYOK routes behind CORS, request-id, trace, timeout, and
//! concurrency-limit layers. Provider credentials are never read here; every
//! request carries its own key.

use crate::config::GatewayConfig;
use crate::routes;
use crate::status_store::StatusStore;
use anyhow::Result;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, HeaderValue, Method, Request, StatusCode};
use axum::response::Response;
use axum::Extension;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::classify::ServerErrorsFailureClass;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub status_store: StatusStore,
}

pub async fn doctor(config_path: Option<PathBuf>) -> Result<()> {
    let cfg = GatewayConfig::load(config_path).await?;
    let db_path = cfg.db_path();
    StatusStore::open(&db_path)?;
    tracing::info!(
        bind_addr = %cfg.server.bind_addr,
        db_path = %db_path.display(),
        cors_any_origin = cfg.allows_any_origin(),
        "config ok"
    );
    Ok(())
}

pub async fn serve(config_path: Option<PathBuf>) -> Result<()> {
    let cfg = GatewayConfig::load(config_path).await?;
    let addr = cfg.bind_addr();
    let db_path = cfg.db_path();
    tracing::info!(
        bind_addr = %addr,
        http_timeout_seconds = cfg.server.http_timeout_seconds,
        http_max_in_flight = cfg.server.http_max_in_flight,
        cors_allowed_origins = ?cfg.cors.allowed_origins,
        db_path = %db_path.display(),
        "server configuration loaded"
    );

    let listener = preflight_bind_listener(addr).await?;
    let status_store = StatusStore::open(&db_path)?;
    let cors = build_cors(&cfg)?;

    let state = Arc::new(AppState { status_store });

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id_from_headers(request.headers())
            )
        })
        .on_response(
            |response: &Response, latency: Duration, _span: &tracing::Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis() as u64,
                    "http request completed"
                );
            },
        )
        .on_failure(
            |error: ServerErrorsFailureClass, latency: Duration, _span: &tracing::Span| {
                tracing::error!(
                    error_class = %error,
                    latency_ms = latency.as_millis() as u64,
                    "http request failed"
                );
            },
        );

    let app = routes::router()
        .layer(Extension(state))
        .layer(cors)
        .layer(GlobalConcurrencyLimitLayer::new(cfg.server.http_max_in_flight))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(cfg.server.http_timeout_seconds),
        ))
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    tracing::info!(%addr, "cyberai serving");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("http server shutdown completed");

    Ok(())
}

async fn preflight_bind_listener(addr: SocketAddr) -> Result<tokio::net::TcpListener> {
    tracing::info!(%addr, "preflight bind check starting");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("preflight bind failed for {addr}: {e}"))?;
    tracing::info!(%addr, "preflight bind check passed");
    Ok(listener)
}

fn build_cors(cfg: &GatewayConfig) -> Result<CorsLayer> {
    if cfg.allows_any_origin() {
        // Wildcard origin cannot carry credentials.
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }
    let origins = cfg
        .cors
        .allowed_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .map_err(|e| anyhow::anyhow!("invalid cors origin {o:?}: {e}"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true))
}

fn request_id_from_headers(headers: &HeaderMap) -> String {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "missing".to_string())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut terminate = match signal(SignalKind::terminate()) {
            Ok(sig) => sig,
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler; falling back to ctrl_c only");
                if let Err(ctrlc_err) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %ctrlc_err, "failed to await ctrl-c signal");
                }
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::warn!("received ctrl-c; beginning graceful shutdown");
            }
            _ = terminate.recv() => {
                tracing::warn!("received SIGTERM; beginning graceful shutdown");
            }
        }
    }
    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to await ctrl-c signal");
        } else {
            tracing::warn!("received ctrl-c; beginning graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_config_builds_permissive_cors() {
        let cfg = GatewayConfig::default();
        assert!(build_cors(&cfg).is_ok());
    }

    #[test]
    fn explicit_origin_list_builds_cors_with_credentials() {
        let cfg: GatewayConfig = toml::from_str(
            r#"
            [cors]
            allowed_origins = ["https://app.example.com"]
            "#,
        )
        .expect("parse");
        assert!(build_cors(&cfg).is_ok());
    }

    #[test]
    fn malformed_origin_is_rejected() {
        let cfg: GatewayConfig = toml::from_str(
            r#"
            [cors]
            allowed_origins = ["https://app.example.com\u007F"]
            "#,
        )
        .expect("parse");
        assert!(build_cors(&cfg).is_err());
    }
}
