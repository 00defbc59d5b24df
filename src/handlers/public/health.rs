use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::AppState;
use crate::database::DatabaseManager;
use crate::error::ApiError;

/// GET /health - Liveness plus a database ping
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    DatabaseManager::health_check(state.drinks.pool()).await?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "success": true,
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "database": "ok",
        })),
    ))
}
