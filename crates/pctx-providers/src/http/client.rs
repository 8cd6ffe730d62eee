//! HTTP Client Configuration

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use pctx_domain::error::{Error, Result};

/// HTTP client configuration
///
/// Controls connection pooling and the default request timeout. Individual
/// requests may still override the timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Maximum idle connections per host
    pub max_idle_per_host: usize,
    /// Idle connection timeout
    pub idle_timeout: Duration,
    /// TCP keep-alive duration
    pub keepalive: Duration,
    /// Total timeout for requests
    pub timeout: Duration,
    /// Connect timeout
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            idle_timeout: Duration::from_secs(90),
            keepalive: Duration::from_secs(60),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            user_agent: format!("pctx/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create configuration with custom timeout only
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            connect_timeout: timeout.min(Duration::from_secs(5)),
            ..Default::default()
        }
    }
}

/// Build a pooled `reqwest::Client` from `config`
pub fn build_client(config: &HttpClientConfig) -> Result<Client> {
    Client::builder()
        .pool_max_idle_per_host(config.max_idle_per_host)
        .pool_idle_timeout(config.idle_timeout)
        .tcp_keepalive(config.keepalive)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(|e| Error::configuration_with_source("Failed to build HTTP client", e))
}

/// Map a failed `reqwest` request onto the domain error taxonomy
///
/// Timeouts become `Timeout`, connection and other transport failures become
/// `Network`, status errors become `Http`, body decoding failures become
/// `InvalidResponse`.
pub fn classify_request_error(context: &str, e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::timeout(format!("{context}: request timed out"))
    } else if let Some(status) = e.status() {
        Error::http(status.as_u16(), format!("{context}: {e}"))
    } else if e.is_decode() {
        Error::invalid_response(format!("{context}: {e}"))
    } else if e.is_builder() {
        Error::invalid_argument(format!("{context}: {e}"))
    } else {
        Error::network_with_source(format!("{context}: request failed"), e)
    }
}
