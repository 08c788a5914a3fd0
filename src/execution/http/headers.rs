//! HTTP Headers Utility
//!
//! Builds the header set for a scoring request: content type, bearer
//! authorization and the deployment-routing header.

use crate::defaults::http::DEPLOYMENT_HEADER;
use crate::error::LlmError;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::collections::HashMap;

/// HTTP header builder for scoring requests
pub struct HttpHeaderBuilder {
    headers: HeaderMap,
}

impl HttpHeaderBuilder {
    /// Create a new header builder
    pub fn new() -> Self {
        Self {
            headers: HeaderMap::new(),
        }
    }

    /// Add Bearer token authorization
    pub fn with_bearer_auth(mut self, token: &str) -> Result<Self, LlmError> {
        let mut auth_value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| {
            LlmError::ConfigurationError(format!("Invalid API key format: {e}"))
        })?;
        auth_value.set_sensitive(true);
        self.headers.insert(AUTHORIZATION, auth_value);
        Ok(self)
    }

    /// Add the content type of the request body
    pub fn with_content_type(mut self, mime: &str) -> Result<Self, LlmError> {
        self.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(mime)
                .map_err(|e| LlmError::ConfigurationError(format!("Invalid content type: {e}")))?,
        );
        Ok(self)
    }

    /// Add the accepted response type
    pub fn with_accept(mut self, mime: &str) -> Result<Self, LlmError> {
        self.headers.insert(
            ACCEPT,
            HeaderValue::from_str(mime)
                .map_err(|e| LlmError::ConfigurationError(format!("Invalid accept type: {e}")))?,
        );
        Ok(self)
    }

    /// Route the request to a specific deployment behind the endpoint.
    ///
    /// An empty name leaves the header off so the endpoint's traffic rules apply.
    pub fn with_deployment(self, deployment_name: &str) -> Result<Self, LlmError> {
        if deployment_name.is_empty() {
            return Ok(self);
        }
        self.with_header(DEPLOYMENT_HEADER, deployment_name)
    }

    /// Add a custom header
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, LlmError> {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            LlmError::ConfigurationError(format!("Invalid header name '{name}': {e}"))
        })?;
        self.headers.insert(
            header_name,
            HeaderValue::from_str(value).map_err(|e| {
                LlmError::ConfigurationError(format!("Invalid header value '{value}': {e}"))
            })?,
        );
        Ok(self)
    }

    /// Add multiple custom headers from a HashMap
    pub fn with_custom_headers(
        mut self,
        custom_headers: &HashMap<String, String>,
    ) -> Result<Self, LlmError> {
        for (key, value) in custom_headers {
            self = self.with_header(key, value)?;
        }
        Ok(self)
    }

    /// Build the final HeaderMap
    pub fn build(self) -> HeaderMap {
        self.headers
    }
}

impl Default for HttpHeaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
