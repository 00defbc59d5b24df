use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

/// Success envelope: the body's fields are flattened next to `"success": true`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub body: T,
    pub status_code: StatusCode,
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    success: bool,
    #[serde(flatten)]
    body: &'a T,
}

/// `{"drinks": [...]}`
#[derive(Debug, Serialize)]
pub struct DrinksBody<D: Serialize> {
    pub drinks: Vec<D>,
}

/// `{"delete": id}`
#[derive(Debug, Serialize)]
pub struct DeletedBody {
    pub delete: i64,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with default 200 status
    pub fn success(body: T) -> Self {
        Self {
            body,
            status_code: StatusCode::OK,
        }
    }
}

impl<D: Serialize> ApiResponse<DrinksBody<D>> {
    pub fn drinks(drinks: Vec<D>) -> Self {
        Self::success(DrinksBody { drinks })
    }
}

impl ApiResponse<DeletedBody> {
    pub fn deleted(id: i64) -> Self {
        Self::success(DeletedBody { delete: id })
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let envelope = Envelope {
            success: true,
            body: &self.body,
        };

        match serde_json::to_value(&envelope) {
            Ok(value) => (self.status_code, Json(value)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "success": false,
                        "error": 500,
                        "message": "internal server error"
                    })),
                )
                    .into_response()
            }
        }
    }
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
