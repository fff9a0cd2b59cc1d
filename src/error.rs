//! Error types for the proxy
//!
//! The cache itself never fails; these cover the upstream round trip.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Proxy Error Enum ==
/// Failures while forwarding a request to the upstream API.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// The shared HTTP client could not be built
    #[error("Error creating HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The outbound request could not be constructed
    #[error("Error creating request: {0}")]
    BuildRequest(String),

    /// The upstream could not be reached or timed out
    #[error("Upstream error: {0}")]
    Upstream(#[source] reqwest::Error),

    /// The upstream response body could not be read
    #[error("Error reading response: {0}")]
    ReadBody(#[source] reqwest::Error),
}

impl ProxyError {
    /// HTTP status returned to the client for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::Client(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::BuildRequest(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::ReadBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string()
        }));

        (self.status_code(), body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
