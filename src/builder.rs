//! `AzureMlModel` Builder
//!
//! Collects configuration, resolves environment fallbacks and validates
//! everything up front, so a model that builds is always callable.

use crate::client::EndpointClient;
use crate::defaults::env;
use crate::error::LlmError;
use crate::execution::http::client::build_http_client_from_config;
use crate::execution::http::transport::{HttpTransport, ReqwestTransport};
use crate::formatters::{ContentFormatter, ModelKwargs};
use crate::model::AzureMlModel;
use crate::persistence::ModelSettings;
use crate::types::HttpConfig;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;

/// Builder for [`AzureMlModel`].
///
/// Unset endpoint URL, API key and deployment name fall back to the
/// `ENDPOINT_URL`, `ENDPOINT_API_KEY` and `DEPLOYMENT_NAME` environment
/// variables.
#[derive(Clone, Default)]
pub struct AzureMlBuilder {
    endpoint_url: Option<String>,
    api_key: Option<SecretString>,
    deployment_name: Option<String>,
    model_kwargs: ModelKwargs,
    content_formatter: Option<Arc<dyn ContentFormatter>>,
    http_config: HttpConfig,
    http_client: Option<reqwest::Client>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl std::fmt::Debug for AzureMlBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureMlBuilder")
            .field("endpoint_url", &self.endpoint_url)
            .field("deployment_name", &self.deployment_name)
            .field("has_api_key", &self.api_key.is_some())
            .field("has_content_formatter", &self.content_formatter.is_some())
            .field("model_kwargs", &self.model_kwargs)
            .field("http_config", &self.http_config)
            .field("has_transport", &self.transport.is_some())
            .finish()
    }
}

impl AzureMlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from persisted settings. The API key and content formatter are
    /// not part of the settings and must be set again.
    pub fn from_settings(settings: ModelSettings) -> Self {
        let mut builder = Self::new()
            .endpoint_url(settings.endpoint_url)
            .deployment_name(settings.deployment_name)
            .model_kwargs(settings.model_kwargs);
        if let Some(ms) = settings.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        builder
    }

    /// Set the scoring URL, e.g. `https://<endpoint>.<region>.inference.ml.azure.com/score`
    pub fn endpoint_url<S: Into<String>>(mut self, url: S) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Set the API key (or AML token) used as the bearer credential
    pub fn api_key<S: Into<String>>(mut self, api_key: S) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    /// Route requests to a named deployment behind the endpoint.
    ///
    /// An empty name sends no routing header and lets the endpoint's traffic
    /// rules pick the deployment.
    pub fn deployment_name<S: Into<String>>(mut self, name: S) -> Self {
        self.deployment_name = Some(name.into());
        self
    }

    /// Replace all generation parameters
    pub fn model_kwargs(mut self, kwargs: ModelKwargs) -> Self {
        self.model_kwargs = kwargs;
        self
    }

    /// Set a single generation parameter; forwarded verbatim
    pub fn param<K: Into<String>>(mut self, key: K, value: serde_json::Value) -> Self {
        self.model_kwargs.insert(key.into(), value);
        self
    }

    /// Set the temperature
    pub fn temperature(self, temperature: f64) -> Self {
        self.param("temperature", serde_json::json!(temperature))
    }

    /// Set the maximum tokens
    pub fn max_tokens(self, max_tokens: u32) -> Self {
        self.param("max_tokens", serde_json::json!(max_tokens))
    }

    /// Set the top-p value
    pub fn top_p(self, top_p: f64) -> Self {
        self.param("top_p", serde_json::json!(top_p))
    }

    /// Set the formatter that encodes requests and decodes responses
    pub fn content_formatter(mut self, formatter: Arc<dyn ContentFormatter>) -> Self {
        self.content_formatter = Some(formatter);
        self
    }

    /// Set request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.http_config.timeout = Some(timeout);
        self
    }

    /// Set connection timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.http_config.connect_timeout = Some(timeout);
        self
    }

    /// Replace the HTTP configuration
    pub fn http_config(mut self, config: HttpConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Set custom HTTP client
    ///
    /// The client is used as given: `connect_timeout`, `proxy` and
    /// `user_agent` from the HTTP configuration are not applied to it. The
    /// request timeout and custom headers still apply to every call.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Set a custom HTTP transport; takes precedence over the HTTP client
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Validate the configuration and build the model.
    ///
    /// No network activity happens here.
    pub fn build(self) -> Result<AzureMlModel, LlmError> {
        // Priority: builder value > environment variable
        let api_key = self
            .api_key
            .filter(|k| !k.expose_secret().trim().is_empty())
            .or_else(|| env_value(env::API_KEY).map(SecretString::from))
            .ok_or_else(|| {
                LlmError::MissingApiKey(format!(
                    "set an API key on the builder or the {} environment variable",
                    env::API_KEY
                ))
            })?;

        let endpoint_url = self
            .endpoint_url
            .filter(|u| !u.trim().is_empty())
            .or_else(|| env_value(env::ENDPOINT_URL))
            .ok_or_else(|| {
                LlmError::ConfigurationError(format!(
                    "endpoint_url is required (or set {})",
                    env::ENDPOINT_URL
                ))
            })?;
        reqwest::Url::parse(&endpoint_url).map_err(|e| {
            LlmError::ConfigurationError(format!("Invalid endpoint_url '{endpoint_url}': {e}"))
        })?;

        let deployment_name = self
            .deployment_name
            .or_else(|| env_value(env::DEPLOYMENT_NAME))
            .unwrap_or_default();

        let content_formatter = self.content_formatter.ok_or_else(|| {
            LlmError::ConfigurationError("a content_formatter must be provided".to_string())
        })?;

        for (name, value) in [
            ("timeout", self.http_config.timeout),
            ("connect_timeout", self.http_config.connect_timeout),
        ] {
            if value == Some(Duration::ZERO) {
                return Err(LlmError::ConfigurationError(format!(
                    "{name} must be greater than zero"
                )));
            }
        }

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => {
                let client = match self.http_client {
                    Some(client) => client,
                    None => build_http_client_from_config(&self.http_config)?,
                };
                Arc::new(ReqwestTransport::new(client))
            }
        };

        tracing::debug!(
            url = %endpoint_url,
            deployment = %deployment_name,
            params = self.model_kwargs.len(),
            "built azureml endpoint model"
        );

        let client = EndpointClient::new(
            endpoint_url,
            api_key,
            deployment_name,
            self.http_config,
            transport,
        );
        Ok(AzureMlModel::new(client, content_formatter, self.model_kwargs))
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
