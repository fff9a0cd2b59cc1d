//! Proxy Module
//!
//! HTTP plumbing around the cache: the axum router, the pass-through
//! handler and the upstream client.
//!
//! # Endpoints
//! - `GET /_proxy/health` - Health check endpoint
//! - `GET /_proxy/stats` - Cache statistics
//! - any other method and path - forwarded upstream, `200 OK` bodies cached

pub mod handlers;
pub mod routes;
pub mod upstream;

pub use handlers::*;
pub use routes::create_router;
pub use upstream::{UpstreamClient, UpstreamResponse};
