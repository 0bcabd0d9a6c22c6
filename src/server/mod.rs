//! # Server: HTTP Surface for the Clock-In Form
//!
//! Runs an Axum HTTP server exposing the job list (read path) and the clock-in
//! submission (write path) as JSON, plus health and metrics endpoints. When a
//! static directory is given it is served as the fallback, so a pre-built form
//! page can live next to the API.
//!
//! Every route except `POST /api/clock-in` runs under [`REQUEST_TIMEOUT`]. The
//! clock-in write is exempt: cutting it off between the time insert and the
//! material insert would commit hours while answering with a bare 408, and
//! the user would resubmit them.

mod routes_clock_in;
mod routes_health;
mod routes_jobs;

use anyhow::Result;
use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::routing::{get, post};
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Instrument};

use crate::prom_metrics;
use crate::store::Backend;

/// Form posts are a handful of short fields.
const BODY_LIMIT_BYTES: usize = 64 * 1024;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct AppState {
    pub store: Backend,
    pub prom_metrics: prom_metrics::Metrics,
}

impl AppState {
    pub fn new(store: Backend) -> Arc<Self> {
        Arc::new(AppState {
            store,
            prom_metrics: prom_metrics::Metrics::new(),
        })
    }
}

/// Records request duration into the Prometheus histogram, generates (or
/// propagates) a request ID, and wraps the request in a tracing span.
async fn metrics_middleware(
    axum::extract::State(state): axum::extract::State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> axum::response::Response {
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let method = req.method().to_string();
    let raw_path = req.uri().path().to_string();
    let start = std::time::Instant::now();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %raw_path,
    );
    let mut response = next.run(req).instrument(span).await;

    state
        .prom_metrics
        .http_request_duration
        .get_or_create(&prom_metrics::HttpLabel {
            method,
            path: normalize_path(&raw_path),
        })
        .observe(start.elapsed().as_secs_f64());

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Collapse static-file paths into one label so the histogram stays bounded.
fn normalize_path(path: &str) -> String {
    match path {
        "/api/jobs" | "/api/clock-in" | "/healthz" | "/readyz" | "/metrics" => path.to_string(),
        p if p.starts_with("/api/") => "/api/:unknown".to_string(),
        _ => "/static".to_string(),
    }
}

pub fn build_router(state: Arc<AppState>, static_dir: Option<&Path>) -> Router {
    build_router_with_timeout(state, static_dir, REQUEST_TIMEOUT)
}

pub fn build_router_with_timeout(
    state: Arc<AppState>,
    static_dir: Option<&Path>,
    timeout: Duration,
) -> Router {
    let mut timed = Router::new()
        .route("/api/jobs", get(routes_jobs::handler_api_jobs))
        .route("/healthz", get(routes_health::handler_healthz))
        .route("/readyz", get(routes_health::handler_readyz))
        .route("/metrics", get(routes_health::handler_metrics));

    if let Some(dir) = static_dir {
        timed = timed.fallback_service(ServeDir::new(dir).append_index_html_on_directories(true));
    }

    // `layer` only wraps routes registered so far.
    let app = timed
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .route("/api/clock-in", post(routes_clock_in::handler_api_clock_in));

    app.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
    .layer(CatchPanicLayer::new())
    .layer(axum::middleware::from_fn_with_state(
        state.clone(),
        metrics_middleware,
    ))
    .layer(TraceLayer::new_for_http())
    .layer(RequestBodyLimitLayer::new(BODY_LIMIT_BYTES))
    .with_state(state)
}

pub async fn run(port: u16, store: Backend, static_dir: Option<&Path>) -> Result<()> {
    let backend = store.kind();
    let state = AppState::new(store);
    let app = build_router(state, static_dir);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, backend, "timeclock listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("timeclock stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_path_keeps_api_routes() {
        assert_eq!(normalize_path("/api/jobs"), "/api/jobs");
        assert_eq!(normalize_path("/api/clock-in"), "/api/clock-in");
        assert_eq!(normalize_path("/readyz"), "/readyz");
    }

    #[test]
    fn normalize_path_collapses_everything_else() {
        assert_eq!(normalize_path("/api/nope/123"), "/api/:unknown");
        assert_eq!(normalize_path("/assets/app-3f9a.js"), "/static");
        assert_eq!(normalize_path("/"), "/static");
    }
}
