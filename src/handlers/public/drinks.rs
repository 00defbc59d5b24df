// handlers/public/drinks.rs - GET /drinks

use axum::extract::State;

use crate::app::AppState;
use crate::database::models::DrinkShort;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, DrinksBody};

/// GET /drinks - Every drink in the short view (ingredient names withheld)
pub async fn list(State(state): State<AppState>) -> ApiResult<DrinksBody<DrinkShort>> {
    let drinks = state.drinks.list().await.map_err(|e| {
        tracing::error!("Failed to list drinks: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(ApiResponse::drinks(drinks.iter().map(|d| d.short()).collect()))
}
