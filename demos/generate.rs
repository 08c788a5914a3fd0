//! Generate text from an Azure ML managed online endpoint.
//!
//! ```bash
//! export ENDPOINT_URL=https://<endpoint>.<region>.inference.ml.azure.com/score
//! export ENDPOINT_API_KEY=...
//! export DEPLOYMENT_NAME=...
//! export AZUREML_FORMATTER=hf   # oss | hf | dolly
//! cargo run --example generate -- "Tell me a joke."
//! ```

use azureml_endpoint::telemetry;
use azureml_endpoint::{
    AzureMlModel, ContentFormatter, DollyContentFormatter, HfContentFormatter, OssContentFormatter,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_from_env()?;

    let prompt = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Tell me a joke.".to_string());

    let formatter: Arc<dyn ContentFormatter> =
        match std::env::var("AZUREML_FORMATTER").as_deref() {
            Ok("hf") => Arc::new(HfContentFormatter),
            Ok("dolly") => Arc::new(DollyContentFormatter),
            _ => Arc::new(OssContentFormatter),
        };

    let llm = AzureMlModel::builder()
        .content_formatter(formatter)
        .temperature(0.7)
        .max_tokens(200)
        .build()?;

    match llm.generate(&prompt, None).await {
        Ok(text) => println!("{text}"),
        Err(e) if e.is_retryable() => eprintln!("transient failure, try again: {e}"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
