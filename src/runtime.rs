// src/runtime.rs

use crate::{
    config::Config,
    engine::{run_script, InFlight, ScriptRequest, ScriptResult},
};

use axum::debug_handler;
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::Span;

/* ---------------- state ---------------- */

/// Shared by every handler. The config is immutable after startup.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub in_flight: InFlight,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            in_flight: InFlight::new(),
        }
    }
}

/* ---------------- server ---------------- */

/// Build the full application router.
///
/// - `POST /run-script` runs an allow-listed script
/// - `GET /` serves the control-panel page
/// - `GET /health` liveness check
/// - anything else is a static file under `root`
pub fn router(config: Config) -> Router {
    let index = ServeFile::new(config.index_path());
    let statics = ServeDir::new(&config.root);
    let state = AppState::new(config);

    Router::new()
        .route("/run-script", post(run_script_handler))
        .route("/health", get(health))
        .route_service("/", index)
        .fallback_service(statics)
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %req.method(),
                        path = %req.uri().path(),
                    )
                })
                .on_response(|res: &Response, latency: Duration, _span: &Span| {
                    tracing::info!(
                        status = res.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "request completed"
                    );
                }),
        )
}

/// Bind and serve until Ctrl-C.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let socket = config.socket_addr();
    let allowed: Vec<&str> = config.allowed_scripts.iter().collect();

    tracing::info!(
        root = %config.root.display(),
        allowed = ?allowed,
        overlap = ?config.execution.overlap,
        timeout_secs = ?config.execution.timeout_secs,
        "pushpanel configured"
    );

    let app = router(config);
    let listener = TcpListener::bind(socket).await?;

    tracing::info!("pushpanel listening on http://{}", socket);
    tracing::info!("Open http://localhost:{} in your browser", socket.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("pushpanel stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/* ---------------- endpoints ---------------- */

async fn health() -> &'static str {
    "ok"
}

#[debug_handler]
async fn run_script_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScriptRequest>, JsonRejection>,
) -> Response {
    // An unreadable body names no script.
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "unusable run-script body");
            ScriptRequest::default()
        }
    };

    match run_script(&state.config, &state.in_flight, req).await {
        Ok(stdout) => (StatusCode::OK, Json(ScriptResult::success(stdout))).into_response(),
        Err(e) => e.into_response(),
    }
}
