//! REST API router and configuration.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::api::handlers::{
    create_event_handler, delete_event_handler, list_events_handler, parse_event_handler, ApiState,
};

/// REST API configuration.
#[derive(Debug, Clone)]
pub struct RestApiConfig {
    /// Enable CORS.
    pub enable_cors: bool,
    /// Allowed origins for CORS; `"*"` allows any.
    pub cors_origins: Vec<String>,
    /// API prefix.
    pub prefix: String,
}

impl Default for RestApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            prefix: "/api".to_string(),
        }
    }
}

/// Create the REST API router.
///
/// Endpoints:
/// - GET    /api/events - List all events
/// - POST   /api/events - Create an event from structured fields
/// - DELETE /api/events - Delete by id
/// - POST   /api/parse  - Ingest a natural-language description
pub fn create_router(state: Arc<ApiState>, config: &RestApiConfig) -> Router {
    let api_routes = Router::new()
        .route(
            "/events",
            get(list_events_handler)
                .post(create_event_handler)
                .delete(delete_event_handler),
        )
        .route("/parse", post(parse_event_handler))
        .with_state(state);

    let router = Router::new().nest(&config.prefix, api_routes);

    if config.enable_cors {
        router.layer(cors_layer(&config.cors_origins))
    } else {
        router
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    if origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(AllowOrigin::list(origins))
    }
}
