use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::auth::TokenVerifier;
use crate::error::ApiError;

/// Per-route gate state: the shared verifier plus the permission this route requires
#[derive(Clone)]
pub struct PermissionGate {
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

impl PermissionGate {
    pub fn new(verifier: Arc<TokenVerifier>, permission: &'static str) -> Self {
        Self { verifier, permission }
    }

    pub fn permission(&self) -> &'static str {
        self.permission
    }
}

/// Validates the bearer token and required permission, then injects the verified
/// `Claims` into request extensions for the handler.
pub async fn require_permission(
    State(gate): State<PermissionGate>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let claims = gate
        .verifier
        .authorize(request.headers(), gate.permission)
        .await
        .map_err(|err| {
            tracing::warn!(
                "Rejected {} {}: {} ({})",
                request.method(),
                request.uri().path(),
                err.code(),
                gate.permission
            );
            ApiError::from(err)
        })?;

    tracing::debug!(
        "Granted '{}' to {}",
        gate.permission,
        claims.sub.as_deref().unwrap_or("<anonymous>")
    );

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
