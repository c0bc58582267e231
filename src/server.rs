use anyhow::{Context, Result};
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc, time::Instant};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    config::Config,
    handlers::{self, AppState},
    logging::{self, LogEvent, LoggerHandle},
    repository::{self, Database},
    signals::setup_signal_handlers,
};

/// Start the Moneybots API server
///
/// This function:
/// 1. Sets up signal handlers for graceful shutdown
/// 2. Connects to PostgreSQL and prepares the schema
/// 3. Installs the structured logger and its rotation task
/// 4. Binds to the configured port
/// 5. Serves requests with graceful shutdown support
pub async fn start_server(config: Config) -> Result<()> {
    let (shutdown_tx, signal_handle) = setup_signal_handlers();
    let mut shutdown_rx = shutdown_tx.subscribe();

    let logger = LoggerHandle::new();
    let db = Database::connect(&config, logger.clone()).await?;

    let rotation_handle = logging::init_logger(
        repository::log_store(&db),
        config.log_dir(),
        logger.clone(),
        shutdown_tx.subscribe(),
    )
    .context("Failed to initialize logger")?;

    logger
        .log_or_trace(
            LogEvent::info(format!("{} started", config.api_name))
                .module("main")
                .field("version", config.api_version.as_str())
                .field("environment", config.server_env.as_str()),
        )
        .await;

    let db = Arc::new(db);
    let state = AppState {
        config: Arc::new(config.clone()),
        users: db.clone(),
        readiness: db,
        logger: logger.clone(),
    };

    let app = create_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));

    logger
        .log_or_trace(
            LogEvent::info("Starting HTTP server")
                .module("main")
                .field("port", config.server_port),
        )
        .await;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        let _ = shutdown_rx.recv().await;
        info!("Shutdown signal received, draining connections...");
    })
    .await?;

    // The signal task only finishes on its own after a signal arrived
    signal_handle.abort();
    let _ = signal_handle.await;
    rotation_handle.await?;

    logger
        .log_or_trace(LogEvent::info("Server stopped gracefully").module("main"))
        .await;

    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index::index))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/auth/login", post(handlers::auth::login))
        .layer(middleware::from_fn_with_state(
            state.logger.clone(),
            log_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Emit `API request` for every request and `Request error` for 4xx/5xx
async fn log_requests(State(logger): State<LoggerHandle>, req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let remote_ip = real_ip(
        req.headers(),
        req.extensions().get::<ConnectInfo<SocketAddr>>().map(|ci| ci.0),
    );

    logger
        .log_or_trace(
            LogEvent::info("API request")
                .module("http")
                .field("method", method.as_str())
                .field("path", path.as_str())
                .field("remote_ip", remote_ip),
        )
        .await;

    let response = next.run(req).await;
    let status = response.status();

    if status.is_client_error() || status.is_server_error() {
        logger
            .log_or_trace(
                LogEvent::error("Request error")
                    .module("http")
                    .field("method", method)
                    .field("path", path)
                    .field("status", status.as_u16())
                    .field("latency_ms", started.elapsed().as_secs_f64() * 1000.0),
            )
            .await;
    }

    response
}

/// Client address: first `X-Forwarded-For` hop, then `X-Real-IP`, then the peer
pub fn real_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let real = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    forwarded
        .or(real)
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_default()
}
