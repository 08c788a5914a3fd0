//! Classification of non-2xx endpoint responses.

use super::LlmError;
use reqwest::header::HeaderMap;

/// Response headers that identify a request on the serving side.
const REQUEST_ID_HEADERS: [&str; 4] = [
    "x-request-id",
    "x-ms-request-id",
    "x-ms-client-request-id",
    "azureml-model-deployment",
];

/// Limit for the body excerpt used when no structured message is found.
const BODY_SAMPLE_CHARS: usize = 200;

/// Turn a non-2xx response into an [`LlmError::ApiError`].
///
/// The message is taken from the usual JSON error shapes
/// (`{"error": {"message": ..}}`, `{"error": ".."}`, `{"message": ..}`),
/// then from the raw body, then from `fallback_message`. The full body is
/// kept in `details` so callers can inspect it.
pub fn classify_http_error(
    status: u16,
    body_text: &str,
    headers: &HeaderMap,
    fallback_message: Option<&str>,
) -> LlmError {
    let parsed = serde_json::from_str::<serde_json::Value>(body_text).ok();

    let mut message = parsed
        .as_ref()
        .and_then(extract_message)
        .or_else(|| {
            let sample: String = body_text.trim().chars().take(BODY_SAMPLE_CHARS).collect();
            (!sample.is_empty()).then_some(sample)
        })
        .or_else(|| fallback_message.map(str::to_string))
        .unwrap_or_else(|| format!("request failed with status {status}"));

    let ids: Vec<String> = REQUEST_ID_HEADERS
        .iter()
        .filter_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .map(|v| format!("{name}={v}"))
        })
        .collect();
    if !ids.is_empty() {
        message = format!("{message} ids=[{}]", ids.join(","));
    }

    let details = parsed.unwrap_or_else(|| serde_json::Value::String(body_text.to_string()));
    LlmError::api_error_with_details(status, message, details)
}

fn extract_message(body: &serde_json::Value) -> Option<String> {
    match body.get("error") {
        Some(serde_json::Value::String(s)) => return Some(s.clone()),
        Some(err) => {
            if let Some(msg) = err.get("message").and_then(|m| m.as_str()) {
                return Some(msg.to_string());
            }
        }
        None => {}
    }
    body.get("message")
        .and_then(|m| m.as_str())
        .map(str::to_string)
}
