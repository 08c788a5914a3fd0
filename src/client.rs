//! Endpoint client
//!
//! Issues the single HTTPS POST for a scoring call. The client knows nothing
//! about payload shapes; it sends the bytes it is given and returns the raw
//! response body, or a typed error.

use crate::defaults::http::DEPLOYMENT_HEADER;
use crate::error::{LlmError, classify_http_error};
use crate::execution::http::headers::HttpHeaderBuilder;
use crate::execution::http::transport::{HttpTransport, HttpTransportRequest};
use crate::formatters::JSON_MIME;
use crate::types::HttpConfig;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

#[derive(Clone)]
pub struct EndpointClient {
    endpoint_url: String,
    api_key: SecretString,
    deployment_name: String,
    http_config: HttpConfig,
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for EndpointClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointClient")
            .field("endpoint_url", &self.endpoint_url)
            .field("deployment_name", &self.deployment_name)
            .field("has_api_key", &!self.api_key.expose_secret().is_empty())
            .field("timeout", &self.http_config.timeout)
            .finish()
    }
}

impl EndpointClient {
    pub fn new(
        endpoint_url: impl Into<String>,
        api_key: SecretString,
        deployment_name: impl Into<String>,
        http_config: HttpConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            api_key,
            deployment_name: deployment_name.into(),
            http_config,
            transport,
        }
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn deployment_name(&self) -> &str {
        &self.deployment_name
    }

    pub fn http_config(&self) -> &HttpConfig {
        &self.http_config
    }

    /// POST a JSON body and return the raw response bytes.
    pub async fn call(&self, body: Vec<u8>) -> Result<Vec<u8>, LlmError> {
        self.call_with_types(body, JSON_MIME, JSON_MIME).await
    }

    /// POST `body` with explicit `Content-Type` and `Accept` values.
    ///
    /// Exactly one attempt is made. A missing key fails before any network
    /// activity; non-2xx responses become [`LlmError::ApiError`].
    pub async fn call_with_types(
        &self,
        body: Vec<u8>,
        content_type: &str,
        accept: &str,
    ) -> Result<Vec<u8>, LlmError> {
        let api_key = self.api_key.expose_secret();
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey(
                "a key should be provided to invoke the endpoint".to_string(),
            ));
        }

        let headers = HttpHeaderBuilder::new()
            .with_custom_headers(&self.http_config.headers)?
            .with_content_type(content_type)?
            .with_accept(accept)?
            .with_bearer_auth(api_key)?
            .with_deployment(&self.deployment_name)?
            .build();

        let request_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!(
            request_id = %request_id,
            url = %self.endpoint_url,
            deployment = %self.deployment_name,
            body_bytes = body.len(),
            "sending scoring request"
        );

        let response = self
            .transport
            .execute(HttpTransportRequest {
                request_id: request_id.clone(),
                url: self.endpoint_url.clone(),
                headers,
                body,
                timeout: self.http_config.timeout,
            })
            .await
            .inspect_err(|e| {
                tracing::warn!(request_id = %request_id, error = %e, "scoring request failed");
            })?;

        if !response.is_success() {
            let text = String::from_utf8_lossy(&response.body);
            let reason = StatusCode::from_u16(response.status)
                .ok()
                .and_then(|s| s.canonical_reason());
            let error = classify_http_error(response.status, &text, &response.headers, reason);
            tracing::warn!(
                request_id = %request_id,
                status = response.status,
                error = %error,
                "endpoint returned an error status"
            );
            return Err(error);
        }

        tracing::debug!(
            request_id = %request_id,
            status = response.status,
            routed_to = response
                .headers
                .get(DEPLOYMENT_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default(),
            body_bytes = response.body.len(),
            "scoring request completed"
        );
        Ok(response.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::http::transport::HttpTransportResponse;
    use async_trait::async_trait;
    use reqwest::header::HeaderMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct ScriptedTransport {
        status: u16,
        body: Vec<u8>,
        calls: Mutex<Vec<HttpTransportRequest>>,
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn execute(
            &self,
            request: HttpTransportRequest,
        ) -> Result<HttpTransportResponse, LlmError> {
            self.calls.lock().expect("lock").push(request);
            Ok(HttpTransportResponse {
                status: self.status,
                headers: HeaderMap::new(),
                body: self.body.clone(),
            })
        }
    }

    fn client(key: &str, transport: Arc<ScriptedTransport>) -> EndpointClient {
        EndpointClient::new(
            "https://example.invalid/score",
            SecretString::from(key.to_string()),
            "blue",
            HttpConfig::default(),
            transport,
        )
    }

    #[tokio::test]
    async fn missing_key_fails_before_transport() {
        let transport = Arc::new(ScriptedTransport::default());
        let err = client("  ", transport.clone())
            .call(b"{}".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey(_)));
        assert!(transport.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn success_returns_raw_body() {
        let transport = Arc::new(ScriptedTransport {
            status: 200,
            body: br#"["ok"]"#.to_vec(),
            ..Default::default()
        });
        let body = client("k", transport.clone())
            .call(b"{}".to_vec())
            .await
            .unwrap();
        assert_eq!(body, br#"["ok"]"#);

        let calls = transport.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].headers.get("authorization").unwrap(), "Bearer k");
        assert_eq!(calls[0].headers.get(DEPLOYMENT_HEADER).unwrap(), "blue");
        assert_eq!(calls[0].timeout, Some(std::time::Duration::from_secs(50)));
    }

    #[tokio::test]
    async fn non_success_status_is_raised() {
        let transport = Arc::new(ScriptedTransport {
            status: 424,
            body: br#"{"message": "An unexpected error occurred in scoring script"}"#.to_vec(),
            ..Default::default()
        });
        let err = client("k", transport).call(b"{}".to_vec()).await.unwrap_err();
        assert_eq!(err.status_code(), Some(424));
        assert!(err.is_transport_error());
        assert!(!err.to_string().contains("None"));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn request_lifecycle_is_logged_without_key() {
        let transport = Arc::new(ScriptedTransport {
            status: 200,
            body: b"[]".to_vec(),
            ..Default::default()
        });
        client("super-secret", transport)
            .call(b"{}".to_vec())
            .await
            .unwrap();

        assert!(logs_contain("sending scoring request"));
        assert!(logs_contain("scoring request completed"));
        assert!(!logs_contain("super-secret"));
    }

    #[test]
    fn debug_output_hides_key() {
        let rendered = format!("{:?}", client("super-secret", Arc::default()));
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("has_api_key: true"));
    }
}
