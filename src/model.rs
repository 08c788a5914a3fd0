//! Model adapter
//!
//! [`AzureMlModel`] is the entry point framework code calls. Each
//! [`generate`](AzureMlModel::generate) call encodes the prompt with the
//! configured formatter, performs one POST and decodes the response.

use crate::builder::AzureMlBuilder;
use crate::client::EndpointClient;
use crate::defaults::LLM_TYPE;
use crate::error::LlmError;
use crate::formatters::{ContentFormatter, ModelKwargs};
use crate::persistence::{ModelSettings, save_settings};
use crate::utils::enforce_stop_sequences;
use std::path::Path;
use std::sync::Arc;

/// A model hosted behind an Azure ML managed online endpoint.
///
/// The adapter holds no mutable state; clones share the HTTP client and
/// formatter and can be used from many tasks at once.
///
/// ```rust,no_run
/// use azureml_endpoint::{AzureMlModel, OssContentFormatter};
/// use std::sync::Arc;
///
/// # async fn run() -> Result<(), azureml_endpoint::LlmError> {
/// let llm = AzureMlModel::builder()
///     .endpoint_url("https://my-endpoint.eastus.inference.ml.azure.com/score")
///     .api_key("my-api-key")
///     .deployment_name("my-deployment")
///     .content_formatter(Arc::new(OssContentFormatter))
///     .temperature(0.7)
///     .build()?;
///
/// let joke = llm.generate("Tell me a joke.", None).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AzureMlModel {
    client: EndpointClient,
    content_formatter: Arc<dyn ContentFormatter>,
    model_kwargs: ModelKwargs,
}

impl std::fmt::Debug for AzureMlModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureMlModel")
            .field("client", &self.client)
            .field("content_type", &self.content_formatter.content_type())
            .field("model_kwargs", &self.model_kwargs)
            .finish()
    }
}

impl AzureMlModel {
    pub(crate) fn new(
        client: EndpointClient,
        content_formatter: Arc<dyn ContentFormatter>,
        model_kwargs: ModelKwargs,
    ) -> Self {
        Self {
            client,
            content_formatter,
            model_kwargs,
        }
    }

    pub fn builder() -> AzureMlBuilder {
        AzureMlBuilder::new()
    }

    /// Generate text for `prompt` using the configured generation parameters.
    ///
    /// When `stop` is given, the decoded text is cut at the first occurrence
    /// of any stop sequence. Stop sequences are not sent to the endpoint.
    pub async fn generate(
        &self,
        prompt: &str,
        stop: Option<&[String]>,
    ) -> Result<String, LlmError> {
        self.generate_with_kwargs(prompt, stop, &ModelKwargs::new())
            .await
    }

    /// Like [`generate`](Self::generate), with per-call parameters layered
    /// over the configured ones (per-call keys win).
    pub async fn generate_with_kwargs(
        &self,
        prompt: &str,
        stop: Option<&[String]>,
        overrides: &ModelKwargs,
    ) -> Result<String, LlmError> {
        if prompt.trim().is_empty() {
            return Err(LlmError::InvalidInput("prompt cannot be empty".to_string()));
        }

        let mut kwargs = self.model_kwargs.clone();
        kwargs.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));

        let formatter = &self.content_formatter;
        let body = formatter.format_request_payload(prompt, &kwargs)?;
        let raw = self
            .client
            .call_with_types(body, formatter.content_type(), formatter.accepts())
            .await?;
        let text = formatter.format_response_payload(&raw).inspect_err(|e| {
            tracing::warn!(
                deployment = %self.client.deployment_name(),
                error = %e,
                "response did not match the formatter's shape"
            );
        })?;

        Ok(match stop {
            Some(stop) if !stop.is_empty() => enforce_stop_sequences(&text, stop),
            _ => text,
        })
    }

    /// Adapter type tag used in logs and persisted settings.
    pub fn llm_type(&self) -> &'static str {
        LLM_TYPE
    }

    /// Parameters that identify this model for caching and tracing.
    pub fn identifying_params(&self) -> serde_json::Value {
        serde_json::json!({
            "deployment_name": self.client.deployment_name(),
            "model_kwargs": self.model_kwargs,
        })
    }

    pub fn endpoint_url(&self) -> &str {
        self.client.endpoint_url()
    }

    pub fn deployment_name(&self) -> &str {
        self.client.deployment_name()
    }

    pub fn model_kwargs(&self) -> &ModelKwargs {
        &self.model_kwargs
    }

    pub fn content_formatter(&self) -> &Arc<dyn ContentFormatter> {
        &self.content_formatter
    }

    /// The persistable part of this adapter's configuration.
    pub fn settings(&self) -> ModelSettings {
        ModelSettings::new(self.client.endpoint_url(), self.client.deployment_name())
            .with_model_kwargs(self.model_kwargs.clone())
            .with_timeout(self.client.http_config().timeout)
    }

    /// Save [`settings`](Self::settings) to a `.yaml`, `.yml` or `.json` file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LlmError> {
        save_settings(&self.settings(), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::http::transport::{
        HttpTransport, HttpTransportRequest, HttpTransportResponse,
    };
    use crate::formatters::{DollyContentFormatter, HfContentFormatter};
    use async_trait::async_trait;
    use reqwest::header::HeaderMap;
    use serde_json::json;
    use std::sync::Mutex;

    struct FixedTransport {
        body: &'static [u8],
        bodies: Mutex<Vec<serde_json::Value>>,
    }

    impl FixedTransport {
        fn new(body: &'static [u8]) -> Arc<Self> {
            Arc::new(Self {
                body,
                bodies: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for FixedTransport {
        async fn execute(
            &self,
            request: HttpTransportRequest,
        ) -> Result<HttpTransportResponse, LlmError> {
            let sent = serde_json::from_slice(&request.body).unwrap_or(serde_json::Value::Null);
            self.bodies.lock().expect("lock").push(sent);
            Ok(HttpTransportResponse {
                status: 200,
                headers: HeaderMap::new(),
                body: self.body.to_vec(),
            })
        }
    }

    fn model(transport: Arc<FixedTransport>, formatter: Arc<dyn ContentFormatter>) -> AzureMlModel {
        AzureMlModel::builder()
            .endpoint_url("https://example.invalid/score")
            .api_key("k")
            .deployment_name("blue")
            .content_formatter(formatter)
            .param("max_new_tokens", json!(32))
            .with_transport(transport)
            .build()
            .expect("build model")
    }

    #[tokio::test]
    async fn generate_composes_encode_call_decode() {
        let transport = FixedTransport::new(br#"["Foo bar"]"#);
        let llm = model(transport.clone(), Arc::new(DollyContentFormatter));

        assert_eq!(llm.generate("Foo", None).await.unwrap(), "Foo bar");
        assert_eq!(
            transport.bodies.lock().unwrap()[0],
            json!({"input_data": {"input_string": ["Foo"]}, "parameters": {"max_new_tokens": 32}})
        );
    }

    #[tokio::test]
    async fn per_call_kwargs_override_configured_ones() {
        let transport = FixedTransport::new(br#"[[{"generated_text": "ok"}]]"#);
        let llm = model(transport.clone(), Arc::new(HfContentFormatter));

        let mut overrides = ModelKwargs::new();
        overrides.insert("max_new_tokens".into(), json!(8));
        overrides.insert("wait_for_model".into(), json!(true));
        llm.generate_with_kwargs("Foo", None, &overrides)
            .await
            .unwrap();

        assert_eq!(
            transport.bodies.lock().unwrap()[0],
            json!({
                "inputs": ["Foo"],
                "parameters": {"max_new_tokens": 8},
                "options": {"wait_for_model": true}
            })
        );
        assert_eq!(llm.model_kwargs()["max_new_tokens"], json!(32));
    }

    #[tokio::test]
    async fn stop_sequences_truncate_output() {
        let transport = FixedTransport::new(br#"["Thought: done\nObservation: more"]"#);
        let llm = model(transport, Arc::new(DollyContentFormatter));
        let stop = vec!["\nObservation:".to_string()];
        assert_eq!(
            llm.generate("Foo", Some(stop.as_slice())).await.unwrap(),
            "Thought: done"
        );
    }

    #[tokio::test]
    async fn decode_failure_propagates_parse_error() {
        let transport = FixedTransport::new(b"not json");
        let llm = model(transport, Arc::new(DollyContentFormatter));
        let err = llm.generate("Foo", None).await.unwrap_err();
        assert!(err.is_parse_error());
    }

    #[tokio::test]
    async fn empty_prompt_is_rejected_without_a_call() {
        let transport = FixedTransport::new(br#"["x"]"#);
        let llm = model(transport.clone(), Arc::new(DollyContentFormatter));
        let err = llm.generate("   ", None).await.unwrap_err();
        assert!(matches!(err, LlmError::InvalidInput(_)));
        assert!(transport.bodies.lock().unwrap().is_empty());
    }

    #[test]
    fn identifying_params_and_settings() {
        let llm = model(FixedTransport::new(b"[]"), Arc::new(DollyContentFormatter));
        assert_eq!(llm.llm_type(), "azureml_endpoint");
        assert_eq!(
            llm.identifying_params(),
            json!({"deployment_name": "blue", "model_kwargs": {"max_new_tokens": 32}})
        );

        let settings = llm.settings();
        assert_eq!(settings.endpoint_url, "https://example.invalid/score");
        assert_eq!(settings.deployment_name, "blue");
        assert_eq!(settings.timeout_ms, Some(50_000));
    }
}
