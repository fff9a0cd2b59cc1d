//! Proxy Handlers
//!
//! The pass-through handler plus the reserved operational endpoints.

use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, HeaderValue, Method, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use tracing::{error, info};

use crate::cache::CacheManager;
use crate::config::Config;
use crate::error::Result;
use crate::models::{HealthResponse, StatsResponse};
use crate::proxy::UpstreamClient;

/// Application state shared across all handlers.
///
/// Both fields are cheap handles; cloning shares the same cache and client.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Response cache
    pub cache: CacheManager,
    /// Upstream HTTP client
    pub upstream: UpstreamClient,
}

impl AppState {
    /// Creates a new AppState from an existing cache and client.
    pub fn new(cache: CacheManager, upstream: UpstreamClient) -> Self {
        Self { cache, upstream }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Starts the cache's expiry sweep, which runs until `shutdown` fires.
    pub fn from_config(
        config: &Config,
        shutdown: tokio::sync::watch::Receiver<bool>,
    ) -> Result<Self> {
        let upstream = UpstreamClient::new(&config.upstream_base_url, config.upstream_timeout())?;
        let cache = CacheManager::new(config.cache_settings(), shutdown);
        Ok(Self::new(cache, upstream))
    }
}

/// Derives the cache key for a request: its path plus query string.
pub fn cache_key(uri: &Uri) -> String {
    uri.path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".to_string())
}

fn json_body(status: StatusCode, body: Bytes) -> Response {
    (
        status,
        [(CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response()
}

/// Fallback handler for every proxied request.
///
/// Serves from cache when possible; otherwise forwards upstream and caches
/// the body of a `200 OK` response.
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response> {
    if method == Method::OPTIONS {
        return Ok(StatusCode::OK.into_response());
    }

    let key = cache_key(&uri);

    if let Some(cached) = state.cache.get(&key).await {
        info!("Cache hit: {}", key);
        return Ok(json_body(StatusCode::OK, cached));
    }

    let authorization = headers.get(AUTHORIZATION).cloned();
    let response = state
        .upstream
        .forward(method, &key, authorization, body)
        .await
        .inspect_err(|e| error!("Forwarding {} failed: {}", key, e))?;

    if response.status == StatusCode::OK {
        state.cache.set(key.clone(), response.body.clone()).await;
        info!("Cache miss and stored: {}", key);
    } else {
        info!(
            "Response not cached due to non-200 status: {}",
            response.status.as_u16()
        );
    }

    Ok(json_body(response.status, response.body))
}

/// Handler for GET /_proxy/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /_proxy/health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
