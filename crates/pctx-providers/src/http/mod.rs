//! HTTP Client Support
//!
//! Client configuration and error classification shared by the HTTP-based
//! providers (status service, node list, discovery registry).
//!
//! - `HttpClientConfig` - connection pool and timeout settings
//! - `build_client` - builds a `reqwest::Client` from a config
//! - `classify_request_error` - maps transport failures onto the domain taxonomy
//! - `HttpResponseUtils` - status and body handling (re-exported from utils)

pub mod client;

pub use client::{HttpClientConfig, build_client, classify_request_error};
pub use crate::utils::HttpResponseUtils;
