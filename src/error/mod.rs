//! Error Handling Module
//!
//! - Core error type (`LlmError`) and its coarse `ErrorCategory`
//! - Classification of non-2xx endpoint responses into `LlmError::ApiError`
//!
//! # Example
//!
//! ```rust,ignore
//! use azureml_endpoint::error::{ErrorCategory, LlmError};
//!
//! let error = LlmError::api_error(503, "Service Unavailable");
//! assert_eq!(error.category(), ErrorCategory::Transport);
//! assert!(error.is_retryable());
//! ```

mod classify;
pub mod types;

pub use classify::classify_http_error;
pub use types::*;
