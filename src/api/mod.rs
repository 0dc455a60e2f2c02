//! API module
//!
//! REST API for character records.

pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use crate::api::app_state::AppState;
use crate::config::config::CorsConfig;
use crate::error::AppError;
use crate::observability::{ObservabilityState, create_observability_router};
use axum::{Router, http::HeaderValue};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Character routes bound to their state, without middleware
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .merge(routes::character_routes::create_character_router())
        .with_state(app_state)
}

/// CORS for the configured browser origins. Credentials are allowed, so
/// methods and headers mirror the request instead of using a wildcard.
pub fn cors_layer(config: &CorsConfig) -> Result<CorsLayer, AppError> {
    let origins = config
        .allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .map_err(|e| AppError::Config(format!("invalid CORS origin {}: {}", origin, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// The full application: greeting and health endpoints plus the
/// character API, with CORS and request tracing
pub fn create_app(
    app_state: AppState,
    observability_state: Arc<ObservabilityState>,
    cors: &CorsConfig,
) -> Result<Router, AppError> {
    Ok(create_observability_router(observability_state)
        .merge(create_router(app_state))
        .layer(cors_layer(cors)?)
        .layer(TraceLayer::new_for_http()))
}
