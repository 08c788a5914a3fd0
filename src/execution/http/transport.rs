//! HTTP transport abstraction.
//!
//! The endpoint client never talks to `reqwest` directly; it hands a fully
//! built request to an [`HttpTransport`]. [`ReqwestTransport`] is the default.
//! Custom transports can observe the final URL, headers and body, or answer
//! with a synthetic response without any network traffic.

use crate::error::LlmError;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::time::Duration;

/// Transport-level request data for one POST.
#[derive(Debug, Clone)]
pub struct HttpTransportRequest {
    /// Correlation id used in log events for this call.
    pub request_id: String,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
    /// Per-request timeout; `None` leaves the client's own timeout in place.
    pub timeout: Option<Duration>,
}

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct HttpTransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpTransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs exactly one HTTP POST per call.
///
/// Implementations report network-level failures as `Err`. A response with
/// any status code, including non-2xx, is returned as `Ok` so the caller can
/// classify it.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: HttpTransportRequest)
    -> Result<HttpTransportResponse, LlmError>;
}

/// Default transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, LlmError> {
        let mut rb = self
            .client
            .post(&request.url)
            .headers(request.headers)
            .body(request.body);
        if let Some(timeout) = request.timeout {
            rb = rb.timeout(timeout);
        }

        let resp = rb.send().await?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?.to_vec();

        Ok(HttpTransportResponse {
            status,
            headers,
            body,
        })
    }
}
