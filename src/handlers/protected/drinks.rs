// handlers/protected/drinks.rs - Permission-gated drink operations
//
// Each route is wrapped by `require_permission`, so a handler body only runs
// once the token is verified and carries the route's permission. The verified
// claims arrive through `Extension<Claims>`.

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    Extension, Json,
};

use crate::app::AppState;
use crate::auth::Claims;
use crate::database::models::{Drink, DrinkChanges, NewDrink};
use crate::database::StoreError;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, DeletedBody, DrinksBody};

/// GET /drinks-detail - Every drink in the long view. Requires `get:drinks-detail`.
pub async fn detail(State(state): State<AppState>) -> ApiResult<DrinksBody<Drink>> {
    let drinks = state.drinks.list().await.map_err(|e| {
        tracing::error!("Failed to list drink details: {}", e);
        ApiError::InternalServerError
    })?;

    Ok(ApiResponse::drinks(drinks))
}

/// POST /drinks - Create a drink. Requires `post:drinks`.
///
/// Any failure, from an unreadable body to a storage error, is reported as 422.
pub async fn create(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<NewDrink>, JsonRejection>,
) -> ApiResult<DrinksBody<Drink>> {
    let Json(new) = payload.map_err(|e| ApiError::unprocessable(e.body_text()))?;

    if new.title.is_empty() {
        return Err(ApiError::unprocessable("title must not be empty"));
    }

    let drink = state.drinks.insert(&new).await.map_err(create_failure)?;

    tracing::info!(
        "Drink {} '{}' created by {}",
        drink.id,
        drink.title,
        claims.sub.as_deref().unwrap_or("<anonymous>")
    );
    Ok(ApiResponse::drinks(vec![drink]))
}

/// PATCH /drinks/:id - Overwrite the given title and/or recipe. Requires `patch:drinks`.
///
/// Unlike create, an empty title is accepted here.
pub async fn update(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<DrinkChanges>, JsonRejection>,
) -> ApiResult<DrinksBody<Drink>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let Json(changes) = payload.map_err(|e| ApiError::unprocessable(e.body_text()))?;

    let drink = state.drinks.update(id, &changes).await.map_err(update_failure)?;

    tracing::info!(
        "Drink {} updated by {}",
        drink.id,
        claims.sub.as_deref().unwrap_or("<anonymous>")
    );
    Ok(ApiResponse::drinks(vec![drink]))
}

/// DELETE /drinks/:id - Permanently remove a drink. Requires `delete:drinks`.
pub async fn delete(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<DeletedBody> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;

    state.drinks.delete(id).await.map_err(delete_failure)?;

    tracing::info!(
        "Drink {} deleted by {}",
        id,
        claims.sub.as_deref().unwrap_or("<anonymous>")
    );
    Ok(ApiResponse::deleted(id))
}

fn create_failure(err: StoreError) -> ApiError {
    match err {
        StoreError::Conflict(_) | StoreError::Encode(_) => ApiError::unprocessable(err.to_string()),
        StoreError::NotFound(_) | StoreError::CorruptRecipe { .. } | StoreError::Sqlx(_) => {
            tracing::error!("Failed to create drink: {}", err);
            ApiError::unprocessable(err.to_string())
        }
    }
}

fn update_failure(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(_) => ApiError::NotFound,
        StoreError::Conflict(_) | StoreError::Encode(_) => ApiError::unprocessable(err.to_string()),
        StoreError::CorruptRecipe { .. } | StoreError::Sqlx(_) => {
            tracing::error!("Failed to update drink: {}", err);
            ApiError::NotFound
        }
    }
}

// Not-found and a failed delete are reported the same way
fn delete_failure(err: StoreError) -> ApiError {
    match err {
        StoreError::NotFound(_) => ApiError::NotFound,
        StoreError::Conflict(_)
        | StoreError::Encode(_)
        | StoreError::CorruptRecipe { .. }
        | StoreError::Sqlx(_) => {
            tracing::error!("Failed to delete drink: {}", err);
            ApiError::NotFound
        }
    }
}
