//! Proxy Routes
//!
//! Configures the Axum router: two reserved operational routes, everything
//! else falls through to the caching proxy handler.

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{health_handler, proxy_handler, stats_handler, AppState};

/// Creates the main router.
///
/// # Endpoints
/// - `GET /_proxy/health` - Health check
/// - `GET /_proxy/stats` - Cache statistics
/// - anything else - forwarded to the upstream through the cache
///
/// # Middleware
/// - CORS: any origin; GET, POST and OPTIONS; Content-Type and Authorization
/// - Tracing: logs all requests
/// - No request body limit, so large bodies are forwarded as-is
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION]);

    Router::new()
        .route("/_proxy/health", get(health_handler))
        .route("/_proxy/stats", get(stats_handler))
        .fallback(proxy_handler)
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
