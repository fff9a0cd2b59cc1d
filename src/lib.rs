//! Cache Proxy - A caching reverse proxy for a single upstream API
//!
//! Forwards requests verbatim and serves repeated `200 OK` responses from a
//! bounded in-memory cache with a fixed TTL.

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod tasks;

pub use cache::{CacheManager, CacheSettings};
pub use config::Config;
pub use proxy::{create_router, AppState};
