// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;

/// HTTP API error. Clients only ever see the status code and a short message.
#[derive(Debug)]
pub enum ApiError {
    // 401 Unauthorized
    Unauthorized(AuthError),

    // 404 Not Found
    NotFound,

    // 422 Unprocessable Entity. The reason is logged, never returned.
    Unprocessable(String),

    // 500 Internal Server Error
    InternalServerError,

    // 503 Service Unavailable
    ServiceUnavailable,
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> String {
        match self {
            ApiError::Unauthorized(err) => err.to_string(),
            ApiError::NotFound => "resource not found".to_string(),
            ApiError::Unprocessable(_) => "unprocessable".to_string(),
            ApiError::InternalServerError => "internal server error".to_string(),
            ApiError::ServiceUnavailable => "service unavailable".to_string(),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.status_code().as_u16(),
            "message": self.message(),
        })
    }

    pub fn unprocessable(reason: impl Into<String>) -> Self {
        ApiError::Unprocessable(reason.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err)
    }
}

impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        tracing::error!("Database unavailable: {}", err);
        ApiError::ServiceUnavailable
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Unprocessable(reason) => write!(f, "unprocessable: {}", reason),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
