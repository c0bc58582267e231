use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use super::AppState;
use crate::error::AppError;
use crate::logging::LogEvent;

/// Health check endpoint
/// Returns 200 OK if the process is serving
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": state.config.api_name,
            "version": state.config.api_version,
        })),
    )
}

/// Readiness check endpoint
/// Returns 200 OK once the database answers, 503 otherwise
pub async fn readiness_check(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    if let Err(e) = state.readiness.ping().await {
        state
            .logger
            .log_or_trace(
                LogEvent::warn("Readiness check failed")
                    .module("http")
                    .err(&e),
            )
            .await;
        return Err(AppError::Unavailable("database is not reachable".to_string()));
    }

    Ok((
        StatusCode::OK,
        Json(json!({
            "status": "ready",
            "service": state.config.api_name,
        })),
    ))
}
