//! Response models for the proxy's own endpoints
//!
//! Proxied traffic is passed through as raw bytes; only the reserved
//! `/_proxy/*` routes serialize these DTOs.

pub mod responses;

// Re-export commonly used types
pub use responses::{HealthResponse, StatsResponse};
