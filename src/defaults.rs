//! Default Configuration Values
//!
//! Centralizes the constants used by the endpoint adapter.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default request timeout for a single scoring call.
    ///
    /// Managed online endpoints routinely take tens of seconds to generate,
    /// so the default is generous. Override it through `HttpConfig`.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(50);

    /// Default connection timeout for establishing HTTP connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("azureml-endpoint/", env!("CARGO_PKG_VERSION"));

    /// Header that pins a request to one deployment behind the endpoint.
    pub const DEPLOYMENT_HEADER: &str = "azureml-model-deployment";
}

/// Environment variables consulted when a builder field is left unset.
pub mod env {
    pub const API_KEY: &str = "ENDPOINT_API_KEY";
    pub const ENDPOINT_URL: &str = "ENDPOINT_URL";
    pub const DEPLOYMENT_NAME: &str = "DEPLOYMENT_NAME";
}

/// Type tag identifying this adapter in persisted settings and logs.
pub const LLM_TYPE: &str = "azureml_endpoint";
