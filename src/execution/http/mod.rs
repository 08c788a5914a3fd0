//! HTTP plumbing for the single scoring call.

pub mod client;
pub mod headers;
pub mod transport;
