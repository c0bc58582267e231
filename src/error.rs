use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application error types
#[derive(Debug)]
pub enum AppError {
    /// Bad credentials
    Unauthorized(String),
    /// Malformed or incomplete request
    BadRequest(String),
    /// Database statement failed
    Database(sqlx::Error),
    /// Dependency not ready (`GET /ready`)
    Unavailable(String),
    /// Internal server error
    Internal(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            Self::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            Self::Database(err) => write!(f, "Database error: {}", err),
            Self::Unavailable(msg) => write!(f, "Service unavailable: {}", msg),
            Self::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            Self::Unauthorized(msg)
            | Self::BadRequest(msg)
            | Self::Unavailable(msg)
            | Self::Internal(msg) => msg.clone(),
            Self::Database(_) => "database error".to_string(),
        };

        let body = Json(json!({
            "status": "error",
            "error_type": error_type_name(&self),
            "message": message,
        }));

        (self.status(), body).into_response()
    }
}

fn error_type_name(error: &AppError) -> &'static str {
    match error {
        AppError::Unauthorized(_) => "unauthorized",
        AppError::BadRequest(_) => "bad_request",
        AppError::Database(_) => "database_error",
        AppError::Unavailable(_) => "unavailable",
        AppError::Internal(_) => "internal_error",
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err)
    }
}
