//! Core error types.

use thiserror::Error;

/// Coarse grouping of [`LlmError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The adapter is missing or carries invalid configuration.
    Configuration,
    /// The caller passed input that cannot be sent.
    Input,
    /// The single HTTP attempt failed (network, timeout, non-2xx).
    Transport,
    /// The endpoint answered but the body did not match the formatter's shape.
    Parsing,
    /// Saving or loading settings failed.
    Persistence,
}

/// Errors produced by the endpoint adapter.
///
/// Every failure is raised as a typed error. Transport failures are never
/// turned into strings and returned as generated text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Configuration is invalid or incomplete.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// No API key was supplied and none was found in the environment.
    #[error("Missing API key: {0}")]
    MissingApiKey(String),

    /// Caller input was rejected before any request was built.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The endpoint returned a non-2xx status.
    #[error("API error {code}: {message}")]
    ApiError {
        code: u16,
        message: String,
        /// Raw response body (JSON when the body parsed, otherwise a string).
        details: Option<serde_json::Value>,
    },

    /// The request did not complete within the configured timeout.
    #[error("Timeout error: {0}")]
    TimeoutError(String),

    /// The connection to the endpoint could not be established.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Any other transport failure reported by the HTTP stack.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The response body could not be decoded by the active formatter.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Settings (de)serialization failed.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Reading or writing a settings file failed.
    #[error("IO error: {0}")]
    IoError(String),
}

impl LlmError {
    /// Build an `ApiError` without details.
    pub fn api_error(code: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Build an `ApiError` carrying the raw response body.
    pub fn api_error_with_details(
        code: u16,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self::ApiError {
            code,
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError(_) | Self::MissingApiKey(_) => ErrorCategory::Configuration,
            Self::InvalidInput(_) => ErrorCategory::Input,
            Self::ApiError { .. }
            | Self::TimeoutError(_)
            | Self::ConnectionError(_)
            | Self::HttpError(_) => ErrorCategory::Transport,
            Self::ParseError(_) => ErrorCategory::Parsing,
            Self::SerializationError(_) | Self::IoError(_) => ErrorCategory::Persistence,
        }
    }

    pub fn is_configuration_error(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn is_transport_error(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }

    /// HTTP status code, when the error came from an endpoint response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Hint for callers that implement their own retry policy.
    ///
    /// The adapter itself makes exactly one attempt per call.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::TimeoutError(_) | Self::ConnectionError(_) => true,
            Self::ApiError { code, .. } => matches!(*code, 408 | 429 | 500..=599),
            _ => false,
        }
    }
}

impl From<std::io::Error> for LlmError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

impl From<serde_yaml::Error> for LlmError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::TimeoutError(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_cover_every_error_kind() {
        assert_eq!(
            LlmError::MissingApiKey("x".into()).category(),
            ErrorCategory::Configuration
        );
        assert!(LlmError::ConfigurationError("x".into()).is_configuration_error());
        assert!(LlmError::api_error(404, "nope").is_transport_error());
        assert!(LlmError::TimeoutError("slow".into()).is_transport_error());
        assert!(LlmError::ParseError("bad".into()).is_parse_error());
        assert!(!LlmError::ParseError("bad".into()).is_transport_error());
    }

    #[test]
    fn retryable_hint() {
        assert!(LlmError::api_error(503, "unavailable").is_retryable());
        assert!(LlmError::api_error(429, "slow down").is_retryable());
        assert!(!LlmError::api_error(400, "bad request").is_retryable());
        assert!(LlmError::TimeoutError("t".into()).is_retryable());
        assert!(!LlmError::ParseError("p".into()).is_retryable());
    }

    #[test]
    fn status_code_only_for_api_errors() {
        assert_eq!(LlmError::api_error(401, "denied").status_code(), Some(401));
        assert_eq!(LlmError::HttpError("x".into()).status_code(), None);
    }
}
