//! Upstream Client
//!
//! Issues the outbound call for a cache miss. Only the method, body and
//! `Authorization` header of the inbound request are carried over.

use std::time::Duration;

use axum::http::{header::AUTHORIZATION, HeaderValue, Method, StatusCode};
use bytes::Bytes;
use reqwest::{Client, Url};

use crate::error::{ProxyError, Result};

/// Status and body of an upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Shared HTTP client bound to one upstream base URL.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Builds a client for `base_url` with a per-request `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProxyError::Client)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins the base URL with a request path and query.
    pub fn url_for(&self, path_and_query: &str) -> Result<Url> {
        let raw = format!("{}{}", self.base_url, path_and_query);
        Url::parse(&raw).map_err(|e| ProxyError::BuildRequest(format!("{}: {}", raw, e)))
    }

    // == Forward ==
    /// Sends the request upstream and reads the full response body.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        authorization: Option<HeaderValue>,
        body: Bytes,
    ) -> Result<UpstreamResponse> {
        let url = self.url_for(path_and_query)?;

        let mut request = self.client.request(method, url).body(body);
        if let Some(value) = authorization {
            request = request.header(AUTHORIZATION, value);
        }

        let response = request.send().await.map_err(ProxyError::Upstream)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ProxyError::ReadBody)?;

        Ok(UpstreamResponse { status, body })
    }
}
