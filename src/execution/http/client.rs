//! HTTP client builder utilities

use crate::error::LlmError;
use crate::types::HttpConfig;

/// Build a `reqwest::Client` from `HttpConfig`.
///
/// Timeouts, proxy and user agent are applied here. Extra headers are added
/// per request by the endpoint client so that they also apply to a
/// caller-supplied `reqwest::Client`.
///
/// # Example
/// ```rust,no_run
/// use azureml_endpoint::types::HttpConfig;
/// use azureml_endpoint::execution::http::client::build_http_client_from_config;
///
/// let config = HttpConfig::default();
/// let client = build_http_client_from_config(&config)?;
/// # Ok::<(), azureml_endpoint::LlmError>(())
/// ```
pub fn build_http_client_from_config(config: &HttpConfig) -> Result<reqwest::Client, LlmError> {
    let mut builder = reqwest::Client::builder();

    if let Some(timeout) = config.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(connect_timeout) = config.connect_timeout {
        builder = builder.connect_timeout(connect_timeout);
    }

    if let Some(proxy_url) = &config.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid proxy URL: {e}")))?;
        builder = builder.proxy(proxy);
    }

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent);
    }

    builder
        .build()
        .map_err(|e| LlmError::ConfigurationError(format!("Failed to create HTTP client: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_build_http_client_default() {
        assert!(build_http_client_from_config(&HttpConfig::default()).is_ok());
    }

    #[test]
    fn test_build_http_client_with_timeout() {
        let config = HttpConfig::builder()
            .timeout(Some(Duration::from_secs(30)))
            .build();
        assert!(build_http_client_from_config(&config).is_ok());
    }

    #[test]
    fn test_build_http_client_invalid_proxy() {
        let config = HttpConfig::builder().proxy(Some("http://[invalid")).build();
        let err = build_http_client_from_config(&config).unwrap_err();
        assert!(err.is_configuration_error());
    }
}
