use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenVerifier;
use crate::config::SecurityConfig;
use crate::database::DrinkRepository;
use crate::handlers;
use crate::middleware::{require_permission, PermissionGate};

/// Shared per-process state, constructed by the entry point and injected into handlers
#[derive(Clone)]
pub struct AppState {
    pub drinks: DrinkRepository,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(drinks: DrinkRepository, verifier: TokenVerifier) -> Self {
        Self {
            drinks,
            verifier: Arc::new(verifier),
        }
    }
}

pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    let verifier = state.verifier.clone();
    let guard = move |permission: &'static str| {
        middleware::from_fn_with_state(
            PermissionGate::new(verifier.clone(), permission),
            require_permission,
        )
    };

    Router::new()
        // Public
        .route("/health", get(handlers::health))
        .route(
            "/drinks",
            get(handlers::drinks_list)
                .merge(post(handlers::drinks_create).route_layer(guard("post:drinks"))),
        )
        // Protected
        .route(
            "/drinks-detail",
            get(handlers::drinks_detail).route_layer(guard("get:drinks-detail")),
        )
        .route(
            "/drinks/:id",
            patch(handlers::drinks_update)
                .route_layer(guard("patch:drinks"))
                .merge(delete(handlers::drinks_delete).route_layer(guard("delete:drinks"))),
        )
        .fallback(handlers::not_found)
        .with_state(state)
        // Global middleware
        .layer(cors_layer(security))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    if security.cors_origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
