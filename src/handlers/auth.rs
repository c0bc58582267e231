use axum::{extract::State, Json};

use super::AppState;
use crate::auth::verify_password;
use crate::error::AppError;
use crate::logging::LogEvent;
use crate::models::{ApiResponse, LoginRequest, LoginResponse};

const INVALID_CREDENTIALS: &str = "invalid user id or password";

/// `POST /auth/login`
///
/// Unknown users and wrong passwords get the same 401 so user ids cannot be
/// enumerated.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let user_id = request.user_id.trim();
    if user_id.is_empty() || request.password.is_empty() {
        return Err(AppError::BadRequest(
            "user_id and password are required".to_string(),
        ));
    }

    let record = state.users.find_user(user_id).await?;

    let verified = match &record {
        Some(record) => verify_password(&request.password, &record.hashed_password)?,
        None => false,
    };

    if !verified {
        state
            .logger
            .log_or_trace(
                LogEvent::warn("Login failed")
                    .module("auth")
                    .field("user_id", user_id),
            )
            .await;
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    state
        .logger
        .log_or_trace(
            LogEvent::info("Login succeeded")
                .module("auth")
                .field("user_id", user_id),
        )
        .await;

    Ok(ApiResponse::success(LoginResponse {
        user_id: user_id.to_string(),
    }))
}
