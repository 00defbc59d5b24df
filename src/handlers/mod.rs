// handlers/mod.rs - Two security tiers
//
// Public (no auth) → Protected (bearer token with a per-route permission)
pub mod public;
pub mod protected;

pub use protected::{drinks_create, drinks_delete, drinks_detail, drinks_update};
pub use public::{drinks_list, health};

use crate::error::ApiError;

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
