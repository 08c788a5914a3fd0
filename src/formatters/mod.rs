//! Content formatters
//!
//! A [`ContentFormatter`] translates between the adapter's plain
//! prompt-plus-parameters call and the JSON shape one model family expects on
//! the wire. The HTTP path never looks inside payloads; it only moves the
//! bytes a formatter produces and hands the response bytes back to it.
//!
//! Built-in formatters cover the common deployment families:
//!
//! - [`OssContentFormatter`]: models from the open-source catalog
//! - [`HfContentFormatter`]: Hugging Face text-generation models
//! - [`DollyContentFormatter`]: `dolly-v2-12b` style single-string output
//!
//! Other deployments are supported by implementing the trait:
//!
//! ```rust,ignore
//! use azureml_endpoint::formatters::{
//!     ContentFormatter, ModelKwargs, parse_response_json, text_at, to_json_bytes,
//! };
//! use azureml_endpoint::LlmError;
//!
//! struct EchoFormatter;
//!
//! impl ContentFormatter for EchoFormatter {
//!     fn format_request_payload(
//!         &self,
//!         prompt: &str,
//!         kwargs: &ModelKwargs,
//!     ) -> Result<Vec<u8>, LlmError> {
//!         to_json_bytes(&serde_json::json!({ "text": prompt, "params": kwargs }))
//!     }
//!
//!     fn format_response_payload(&self, output: &[u8]) -> Result<String, LlmError> {
//!         let json = parse_response_json(output)?;
//!         text_at(&json["echo"], "echo")
//!     }
//! }
//! ```

mod dolly;
mod hf;
mod oss;

pub use dolly::DollyContentFormatter;
pub use hf::HfContentFormatter;
pub use oss::OssContentFormatter;

use crate::error::LlmError;
use serde::Serialize;
use serde_json::Value;

/// Generation parameters forwarded into the request body.
pub type ModelKwargs = serde_json::Map<String, Value>;

/// MIME type used by every built-in formatter.
pub const JSON_MIME: &str = "application/json";

/// Encode/decode pair for one deployment's payload shape.
///
/// Implementations must be all-or-nothing on decode: a body that does not
/// match the expected shape yields [`LlmError::ParseError`], never a partial
/// string.
pub trait ContentFormatter: Send + Sync {
    /// MIME type of the request body, sent as `Content-Type`.
    fn content_type(&self) -> &str {
        JSON_MIME
    }

    /// MIME type expected back from the endpoint, sent as `Accept`.
    fn accepts(&self) -> &str {
        JSON_MIME
    }

    /// Build the HTTP body for `prompt` with the given generation parameters.
    fn format_request_payload(
        &self,
        prompt: &str,
        model_kwargs: &ModelKwargs,
    ) -> Result<Vec<u8>, LlmError>;

    /// Extract the generated text from the raw response body.
    fn format_response_payload(&self, output: &[u8]) -> Result<String, LlmError>;
}

/// Serialize a request document into body bytes.
///
/// Separators are `", "` and `": "`, the layout scoring scripts generated
/// for these endpoints are written against.
pub fn to_json_bytes(value: &Value) -> Result<Vec<u8>, LlmError> {
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value
        .serialize(&mut ser)
        .map_err(|e| LlmError::SerializationError(format!("failed to encode request body: {e}")))?;
    Ok(buf)
}

struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> std::io::Result<()>
    where
        W: ?Sized + std::io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> std::io::Result<()>
    where
        W: ?Sized + std::io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> std::io::Result<()>
    where
        W: ?Sized + std::io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Parse response bytes as JSON, mapping failures to [`LlmError::ParseError`].
pub fn parse_response_json(output: &[u8]) -> Result<Value, LlmError> {
    serde_json::from_slice(output).map_err(|e| {
        let sample: String = String::from_utf8_lossy(output).chars().take(200).collect();
        LlmError::ParseError(format!("response is not valid JSON ({e}): {sample}"))
    })
}

/// Element `index` of a JSON array, or a `ParseError` naming `path`.
pub fn element_at<'a>(value: &'a Value, index: usize, path: &str) -> Result<&'a Value, LlmError> {
    value
        .as_array()
        .ok_or_else(|| LlmError::ParseError(format!("expected an array at {path}")))?
        .get(index)
        .ok_or_else(|| LlmError::ParseError(format!("missing index {index} at {path}")))
}

/// Field `key` of a JSON object, or a `ParseError` naming `path`.
pub fn field_at<'a>(value: &'a Value, key: &str, path: &str) -> Result<&'a Value, LlmError> {
    value
        .as_object()
        .ok_or_else(|| LlmError::ParseError(format!("expected an object at {path}")))?
        .get(key)
        .ok_or_else(|| LlmError::ParseError(format!("missing field \"{key}\" at {path}")))
}

/// The string held by `value`, or a `ParseError` naming `path`.
pub fn text_at(value: &Value, path: &str) -> Result<String, LlmError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| LlmError::ParseError(format!("expected a string at {path}")))
}
