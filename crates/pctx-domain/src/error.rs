//! Error handling types
//!
//! The taxonomy mirrors how failures are treated by the provider stack:
//!
//! | Class | Variants | Single-source retry | Priority fallback |
//! |-------|----------|---------------------|-------------------|
//! | Transient | `Network`, `Timeout`, `Http` (5xx, 429) | yes | yes |
//! | Validation | `Http` (other 4xx), `InvalidResponse`, `Json` | no | yes |
//! | Soft-missing | `NotSupported` | no | yes |
//! | Exhaustion | `AllProvidersFailed` | n/a | surfaced to the caller |

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// A single provider failure recorded during a priority invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderFailure {
    /// Name of the provider that failed
    pub provider: String,
    /// Rendered failure reason
    pub reason: String,
}

fn render_failures(failures: &[ProviderFailure]) -> String {
    if failures.is_empty() {
        return "no providers attempted".to_string();
    }
    failures
        .iter()
        .map(|f| format!("{}: {}", f.provider, f.reason))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Main error type for the Platform Context SDK
#[derive(Error, Debug)]
pub enum Error {
    /// Connection-level failure (refused, reset, DNS)
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An outbound call exceeded its deadline
    #[error("Timeout: {message}")]
    Timeout {
        /// What timed out
        message: String,
    },

    /// Backend answered with a non-success HTTP status
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body or context
        message: String,
    },

    /// Backend was reachable but returned data of the wrong shape
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// Description of the malformed data
        message: String,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Backend reported an application-level error
    #[error("Remote error: {message}")]
    Remote {
        /// Message reported by the backend
        message: String,
    },

    /// The provider does not implement this operation
    #[error("Operation not supported: {operation}")]
    NotSupported {
        /// Operation name
        operation: String,
    },

    /// The provider reported itself as unavailable
    #[error("Provider unavailable: {provider}")]
    Unavailable {
        /// Provider name
        provider: String,
    },

    /// The provider could only offer synthesized data
    #[error("Provider {provider} has no live data (synthesized status only)")]
    Degraded {
        /// Provider name
        provider: String,
    },

    /// Session is not authenticated for data-plane calls
    #[error("Authentication error: {message}")]
    Authentication {
        /// Description of the authentication error
        message: String,
    },

    /// Every candidate provider failed
    #[error("All providers failed for {operation}: {}", render_failures(.failures))]
    AllProvidersFailed {
        /// Operation that was attempted
        operation: String,
        /// Per-provider failures in attempt order
        failures: Vec<ProviderFailure>,
    },

    /// Invalid argument provided to a function
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the invalid argument
        message: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Cache operation error
    #[error("Cache error: {message}")]
    Cache {
        /// Description of the cache error
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },
}

// Classification
impl Error {
    /// Whether a single-source provider should retry this error
    ///
    /// Only network-class failures qualify: connection errors, timeouts,
    /// 5xx responses and rate limiting.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network { .. } | Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Whether this error means the backend answered with bad input or output
    pub fn is_validation(&self) -> bool {
        match self {
            Self::InvalidResponse { .. } | Self::Json { .. } | Self::InvalidArgument { .. } => true,
            Self::Http { status, .. } => (400..500).contains(status) && *status != 429,
            _ => false,
        }
    }

    /// Whether the backend simply does not offer the requested endpoint
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404 | 501, .. } | Self::NotSupported { .. })
    }
}

// Transport error creation methods
impl Error {
    /// Create a network error
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
            source: None,
        }
    }

    /// Create a network error with source
    pub fn network_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Network {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }
}

// Response error creation methods
impl Error {
    /// Create an invalid response error
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Create a remote error
    pub fn remote<S: Into<String>>(message: S) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Create a not supported error
    pub fn not_supported<S: Into<String>>(operation: S) -> Self {
        Self::NotSupported {
            operation: operation.into(),
        }
    }
}

// Provider state error creation methods
impl Error {
    /// Create an unavailable error
    pub fn unavailable<S: Into<String>>(provider: S) -> Self {
        Self::Unavailable {
            provider: provider.into(),
        }
    }

    /// Create a degraded error
    pub fn degraded<S: Into<String>>(provider: S) -> Self {
        Self::Degraded {
            provider: provider.into(),
        }
    }

    /// Create an authentication error
    pub fn authentication<S: Into<String>>(message: S) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Create an exhaustion error
    pub fn all_failed<S: Into<String>>(operation: S, failures: Vec<ProviderFailure>) -> Self {
        Self::AllProvidersFailed {
            operation: operation.into(),
            failures,
        }
    }
}

// Configuration and internal error creation methods
impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
