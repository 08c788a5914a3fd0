//! # azureml-endpoint
//!
//! Call text-generation models hosted on Azure ML managed online endpoints.
//!
//! Deployments disagree on request and response JSON shapes, so the payload
//! handling is pluggable: a [`ContentFormatter`] encodes the prompt and
//! generation parameters and decodes the response body. Built-in formatters
//! cover the open-source catalog, Hugging Face text-generation and
//! `dolly-v2-12b` style deployments; anything else implements the trait.
//!
//! ```rust,no_run
//! use azureml_endpoint::{AzureMlModel, HfContentFormatter};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), azureml_endpoint::LlmError> {
//! let llm = AzureMlModel::builder()
//!     .endpoint_url("https://my-endpoint.eastus.inference.ml.azure.com/score")
//!     .api_key("my-api-key")
//!     .deployment_name("gpt2-deployment")
//!     .content_formatter(Arc::new(HfContentFormatter))
//!     .max_tokens(128)
//!     .build()?;
//!
//! println!("{}", llm.generate("Once upon a time", None).await?);
//! # Ok(())
//! # }
//! ```
//!
//! Each call makes exactly one HTTP attempt. Failures are typed
//! ([`LlmError`]); retrying is left to the caller.
#![deny(unsafe_code)]

pub mod builder;
pub mod client;
pub mod defaults;
pub mod error;
pub mod execution;
pub mod formatters;
pub mod model;
pub mod persistence;
pub mod telemetry;
pub mod types;
pub mod utils;

pub use builder::AzureMlBuilder;
pub use client::EndpointClient;
pub use error::{ErrorCategory, LlmError};
pub use formatters::{
    ContentFormatter, DollyContentFormatter, HfContentFormatter, ModelKwargs,
    OssContentFormatter,
};
pub use model::AzureMlModel;
pub use persistence::{ModelSettings, load_settings, save_settings};

/// Load persisted settings and rebuild a model with a fresh key and formatter.
///
/// Pass `None` for `api_key` to fall back to `ENDPOINT_API_KEY`.
pub fn load_model(
    path: impl AsRef<std::path::Path>,
    api_key: Option<&str>,
    content_formatter: std::sync::Arc<dyn ContentFormatter>,
) -> Result<AzureMlModel, LlmError> {
    let mut builder =
        AzureMlBuilder::from_settings(load_settings(path)?).content_formatter(content_formatter);
    if let Some(key) = api_key {
        builder = builder.api_key(key);
    }
    builder.build()
}
