//! Formatter for models deployed from the open-source model catalog.

use super::{
    ContentFormatter, ModelKwargs, element_at, field_at, parse_response_json, text_at,
    to_json_bytes,
};
use crate::error::LlmError;
use serde_json::json;

/// Request: `{"inputs": {"input_string": [prompt]}, "parameters": kwargs}`.
/// Response: `[{"0": "<generated text>"}]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OssContentFormatter;

impl ContentFormatter for OssContentFormatter {
    fn format_request_payload(
        &self,
        prompt: &str,
        model_kwargs: &ModelKwargs,
    ) -> Result<Vec<u8>, LlmError> {
        to_json_bytes(&json!({
            "inputs": { "input_string": [prompt] },
            "parameters": model_kwargs,
        }))
    }

    fn format_response_payload(&self, output: &[u8]) -> Result<String, LlmError> {
        let json = parse_response_json(output)?;
        let first = element_at(&json, 0, "$")?;
        text_at(field_at(first, "0", "$[0]")?, "$[0].0")
    }
}
