use axum::extract::State;

use super::AppState;
use crate::models::ApiResponse;

/// `GET /`: API name and version
pub async fn index(State(state): State<AppState>) -> ApiResponse<String> {
    ApiResponse::success(format!(
        "{} {}",
        state.config.api_name, state.config.api_version
    ))
}
