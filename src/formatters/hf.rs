//! Formatter for Hugging Face text-generation models.

use super::{
    ContentFormatter, ModelKwargs, element_at, field_at, parse_response_json, text_at,
    to_json_bytes,
};
use crate::error::LlmError;
use serde_json::json;

/// Inference options that belong in `"options"` rather than `"parameters"`.
const OPTION_KEYS: [&str; 2] = ["use_cache", "wait_for_model"];

/// Request: `{"inputs": [prompt], "parameters": kwargs}`.
/// Response: `[[{"generated_text": "<text>"}]]`.
///
/// When `use_cache` or `wait_for_model` appear in the kwargs they are moved
/// into a separate `"options"` object, which the text-generation container
/// reads instead of the generation parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct HfContentFormatter;

impl ContentFormatter for HfContentFormatter {
    fn format_request_payload(
        &self,
        prompt: &str,
        model_kwargs: &ModelKwargs,
    ) -> Result<Vec<u8>, LlmError> {
        let mut parameters = model_kwargs.clone();
        let mut options = ModelKwargs::new();
        for key in OPTION_KEYS {
            if let Some(value) = parameters.shift_remove(key) {
                options.insert(key.to_string(), value);
            }
        }

        let mut body = json!({
            "inputs": [prompt],
            "parameters": parameters,
        });
        if !options.is_empty() {
            body["options"] = serde_json::Value::Object(options);
        }
        to_json_bytes(&body)
    }

    fn format_response_payload(&self, output: &[u8]) -> Result<String, LlmError> {
        let json = parse_response_json(output)?;
        let outer = element_at(&json, 0, "$")?;
        let inner = element_at(outer, 0, "$[0]")?;
        text_at(
            field_at(inner, "generated_text", "$[0][0]")?,
            "$[0][0].generated_text",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(kwargs: &ModelKwargs) -> serde_json::Value {
        let body = HfContentFormatter
            .format_request_payload("Foo", kwargs)
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[test]
    fn encodes_documented_shape() {
        let mut kwargs = ModelKwargs::new();
        kwargs.insert("top_p".into(), json!(0.9));
        assert_eq!(
            encode(&kwargs),
            json!({"inputs": ["Foo"], "parameters": {"top_p": 0.9}})
        );
    }

    #[test]
    fn relocation_keeps_remaining_parameter_order() {
        let mut kwargs = ModelKwargs::new();
        kwargs.insert("temperature".into(), json!(0.5));
        kwargs.insert("use_cache".into(), json!(false));
        kwargs.insert("max_new_tokens".into(), json!(8));
        kwargs.insert("do_sample".into(), json!(true));
        let body = HfContentFormatter
            .format_request_payload("Foo", &kwargs)
            .unwrap();
        assert_eq!(
            String::from_utf8(body).unwrap(),
            r#"{"inputs": ["Foo"], "parameters": {"temperature": 0.5, "max_new_tokens": 8, "do_sample": true}, "options": {"use_cache": false}}"#
        );
    }

    #[test]
    fn relocates_inference_options() {
        let mut kwargs = ModelKwargs::new();
        kwargs.insert("temperature".into(), json!(0.2));
        kwargs.insert("use_cache".into(), json!(false));
        kwargs.insert("wait_for_model".into(), json!(true));
        assert_eq!(
            encode(&kwargs),
            json!({
                "inputs": ["Foo"],
                "parameters": {"temperature": 0.2},
                "options": {"use_cache": false, "wait_for_model": true}
            })
        );
    }

    #[test]
    fn decodes_nested_generated_text() {
        let raw = br#"[[{"generated_text": "Foo, said the model"}]]"#;
        assert_eq!(
            HfContentFormatter.format_response_payload(raw).unwrap(),
            "Foo, said the model"
        );
    }

    #[test]
    fn flat_response_is_rejected() {
        let raw = br#"[{"generated_text": "flat"}]"#;
        assert!(
            HfContentFormatter
                .format_response_payload(raw)
                .unwrap_err()
                .is_parse_error()
        );
    }
}
