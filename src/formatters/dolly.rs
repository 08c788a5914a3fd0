//! Formatter for `dolly-v2-12b` style deployments.

use super::{ContentFormatter, ModelKwargs, element_at, parse_response_json, text_at, to_json_bytes};
use crate::error::LlmError;
use serde_json::json;

/// Request: `{"input_data": {"input_string": [prompt]}, "parameters": kwargs}`.
/// Response: `["<generated text>"]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DollyContentFormatter;

impl ContentFormatter for DollyContentFormatter {
    fn format_request_payload(
        &self,
        prompt: &str,
        model_kwargs: &ModelKwargs,
    ) -> Result<Vec<u8>, LlmError> {
        to_json_bytes(&json!({
            "input_data": { "input_string": [prompt] },
            "parameters": model_kwargs,
        }))
    }

    fn format_response_payload(&self, output: &[u8]) -> Result<String, LlmError> {
        let json = parse_response_json(output)?;
        text_at(element_at(&json, 0, "$")?, "$[0]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_input_data_shape() {
        let mut kwargs = ModelKwargs::new();
        kwargs.insert("max_new_tokens".into(), json!(250));
        let body = DollyContentFormatter
            .format_request_payload("Foo", &kwargs)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(
            value,
            json!({"input_data": {"input_string": ["Foo"]}, "parameters": {"max_new_tokens": 250}})
        );
    }

    #[test]
    fn decodes_first_array_element() {
        let raw = br#"["Foo is a placeholder name", "ignored"]"#;
        assert_eq!(
            DollyContentFormatter.format_response_payload(raw).unwrap(),
            "Foo is a placeholder name"
        );
    }

    #[test]
    fn truncated_json_is_a_parse_error() {
        assert!(
            DollyContentFormatter
                .format_response_payload(br#"["Foo is a pla"#)
                .unwrap_err()
                .is_parse_error()
        );
    }
}
